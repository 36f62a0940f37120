use crate::domain::model::OrderPayload;
use chrono::{DateTime, TimeDelta, Utc};

pub const DEFAULT_STORE_NAME: &str = "Jejak Mufassir";

/// 前端下拉選單的預設值，不算是真的優惠券
const VOUCHER_PLACEHOLDER: &str = "Pilih Voucher";

const JAKARTA_UTC_OFFSET_HOURS: i64 = 7;

/// 將訂單渲染成給管理員看的 WhatsApp 訊息
pub fn format_order_message(order: &OrderPayload, store_name: &str, now: DateTime<Utc>) -> String {
    let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    let voucher_line = match order.voucher.as_deref() {
        Some(voucher) if voucher != VOUCHER_PLACEHOLDER => format!("🎫 *Voucher:* {}", voucher),
        _ => String::new(),
    };

    let notes_block = order
        .catatan
        .as_ref()
        .map(|notes| format!("📝 *Catatan Pembeli:*\n{}", notes))
        .unwrap_or_default();

    let dropshipper_block = order
        .nama_dropshipper
        .as_ref()
        .map(|name| {
            format!(
                "🏪 *Info Dropshipper:*\n• Nama: {}\n• No. HP: {}",
                name,
                or_dash(&order.nomor_dropshipper)
            )
        })
        .unwrap_or_default();

    let timestamp = order
        .timestamp
        .clone()
        .unwrap_or_else(|| format_jakarta_time(now));

    format!(
        "🛍️ *PESANAN BARU {header}*

📋 *Detail Pesanan:*
• Invoice: {invoice}
• Produk: {product}
• Jenis: {jenis}
• Jumlah: {quantity}
• SKU: {sku}
• Harga: Rp {price}

👤 *Data Pembeli:*
• Nama: {name}
• No. HP: {phone}
• Email: {email}

📍 *Alamat Pengiriman:*
{address}
{city}

🚚 *Pengiriman & Pembayaran:*
• Kurir: {kurir}
• Metode Bayar: {payment}
• Status: {status}

{voucher_line}

💰 *Total Pembayaran:*
Rp {total}

⏰ *Waktu Pesanan:*
{timestamp}

{notes_block}

{dropshipper_block}

---
*{store_name} - Admin Dashboard*",
        header = store_name.to_uppercase(),
        invoice = or_dash(&order.invoice_number),
        product = or_dash(&order.product_name),
        jenis = or_dash(&order.jenis_produk),
        quantity = order.quantity.as_deref().unwrap_or("1"),
        sku = or_dash(&order.sku),
        price = format_currency(order.product_price.as_deref()),
        name = or_dash(&order.full_name),
        phone = or_dash(&order.phone_number),
        email = or_dash(&order.email),
        address = or_dash(&order.address),
        city = or_dash(&order.city),
        kurir = or_dash(&order.kurir),
        payment = or_dash(&order.payment_method),
        status = order.status.as_deref().unwrap_or("Pending"),
        voucher_line = voucher_line,
        total = format_currency(order.total_payment.as_deref()),
        timestamp = timestamp,
        notes_block = notes_block,
        dropshipper_block = dropshipper_block,
        store_name = store_name,
    )
}

/// 取開頭的整數部分，以 `.` 分隔千位 (id-ID)
pub fn format_currency(amount: Option<&str>) -> String {
    let Some(amount) = amount else {
        return "0".to_string();
    };

    let trimmed = amount.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return "0".to_string();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// 雅加達時間，格式同 id-ID 的 toLocaleString，例如 `5/1/2026, 09.05.03`
pub fn format_jakarta_time(now: DateTime<Utc>) -> String {
    let local = now.naive_utc() + TimeDelta::hours(JAKARTA_UTC_OFFSET_HOURS);
    local.format("%-d/%-m/%Y, %H.%M.%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 2, 5, 3).unwrap()
    }

    fn full_order() -> OrderPayload {
        OrderPayload {
            invoice_number: Some("INV-20260105-001".to_string()),
            product_name: Some("Tafsir Al-Mishbah".to_string()),
            jenis_produk: Some("Hard Cover".to_string()),
            quantity: Some("2".to_string()),
            sku: Some("TAF-HC-01".to_string()),
            product_price: Some("150000".to_string()),
            full_name: Some("Ahmad Fauzi".to_string()),
            phone_number: Some("081234567890".to_string()),
            email: Some("ahmad@example.com".to_string()),
            address: Some("Jl. Merdeka No. 10".to_string()),
            city: Some("Bandung".to_string()),
            kurir: Some("JNE REG".to_string()),
            payment_method: Some("Transfer BCA".to_string()),
            status: Some("Menunggu Pembayaran".to_string()),
            voucher: Some("HEMAT10".to_string()),
            total_payment: Some("285000".to_string()),
            timestamp: Some("5/1/2026, 09.05.03".to_string()),
            catatan: Some("Tolong dibungkus kado".to_string()),
            nama_dropshipper: Some("Toko Berkah".to_string()),
            nomor_dropshipper: Some("085711112222".to_string()),
        }
    }

    #[test]
    fn test_format_full_order() {
        let message = format_order_message(&full_order(), DEFAULT_STORE_NAME, fixed_now());

        let expected = "🛍️ *PESANAN BARU JEJAK MUFASSIR*

📋 *Detail Pesanan:*
• Invoice: INV-20260105-001
• Produk: Tafsir Al-Mishbah
• Jenis: Hard Cover
• Jumlah: 2
• SKU: TAF-HC-01
• Harga: Rp 150.000

👤 *Data Pembeli:*
• Nama: Ahmad Fauzi
• No. HP: 081234567890
• Email: ahmad@example.com

📍 *Alamat Pengiriman:*
Jl. Merdeka No. 10
Bandung

🚚 *Pengiriman & Pembayaran:*
• Kurir: JNE REG
• Metode Bayar: Transfer BCA
• Status: Menunggu Pembayaran

🎫 *Voucher:* HEMAT10

💰 *Total Pembayaran:*
Rp 285.000

⏰ *Waktu Pesanan:*
5/1/2026, 09.05.03

📝 *Catatan Pembeli:*
Tolong dibungkus kado

🏪 *Info Dropshipper:*
• Nama: Toko Berkah
• No. HP: 085711112222

---
*Jejak Mufassir - Admin Dashboard*";

        assert_eq!(message, expected);
    }

    #[test]
    fn test_format_minimal_order_uses_defaults() {
        let order = OrderPayload {
            invoice_number: Some("INV-2".to_string()),
            ..Default::default()
        };

        let message = format_order_message(&order, DEFAULT_STORE_NAME, fixed_now());

        let expected = "🛍️ *PESANAN BARU JEJAK MUFASSIR*

📋 *Detail Pesanan:*
• Invoice: INV-2
• Produk: -
• Jenis: -
• Jumlah: 1
• SKU: -
• Harga: Rp 0

👤 *Data Pembeli:*
• Nama: -
• No. HP: -
• Email: -

📍 *Alamat Pengiriman:*
-
-

🚚 *Pengiriman & Pembayaran:*
• Kurir: -
• Metode Bayar: -
• Status: Pending



💰 *Total Pembayaran:*
Rp 0

⏰ *Waktu Pesanan:*
5/1/2026, 09.05.03





---
*Jejak Mufassir - Admin Dashboard*";

        assert_eq!(message, expected);
    }

    #[test]
    fn test_voucher_placeholder_is_hidden() {
        let order = OrderPayload {
            invoice_number: Some("INV-3".to_string()),
            voucher: Some("Pilih Voucher".to_string()),
            ..Default::default()
        };

        let message = format_order_message(&order, DEFAULT_STORE_NAME, fixed_now());
        assert!(!message.contains("Voucher:"));
    }

    #[test]
    fn test_dropshipper_without_number() {
        let order = OrderPayload {
            invoice_number: Some("INV-4".to_string()),
            nama_dropshipper: Some("Reseller A".to_string()),
            ..Default::default()
        };

        let message = format_order_message(&order, DEFAULT_STORE_NAME, fixed_now());
        assert!(message.contains("🏪 *Info Dropshipper:*\n• Nama: Reseller A\n• No. HP: -"));
    }

    #[test]
    fn test_falsy_fields_fall_back_to_defaults() {
        let order = OrderPayload::from_value(serde_json::json!({
            "invoiceNumber": "INV-6",
            "quantity": 0,
            "catatan": false,
            "namaDropshipper": false
        }))
        .unwrap();

        let message = format_order_message(&order, DEFAULT_STORE_NAME, fixed_now());
        assert!(message.contains("• Jumlah: 1\n"));
        assert!(!message.contains("Catatan Pembeli"));
        assert!(!message.contains("Info Dropshipper"));
        assert!(!message.contains("false"));
    }

    #[test]
    fn test_custom_store_name() {
        let order = OrderPayload {
            invoice_number: Some("INV-5".to_string()),
            ..Default::default()
        };

        let message = format_order_message(&order, "Toko Buku Hikmah", fixed_now());
        assert!(message.starts_with("🛍️ *PESANAN BARU TOKO BUKU HIKMAH*"));
        assert!(message.ends_with("*Toko Buku Hikmah - Admin Dashboard*"));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(None), "0");
        assert_eq!(format_currency(Some("0")), "0");
        assert_eq!(format_currency(Some("999")), "999");
        assert_eq!(format_currency(Some("1000")), "1.000");
        assert_eq!(format_currency(Some("150000")), "150.000");
        assert_eq!(format_currency(Some("1250000.75")), "1.250.000");
        assert_eq!(format_currency(Some("-5000")), "-5.000");
        assert_eq!(format_currency(Some("  007500")), "7.500");
        assert_eq!(format_currency(Some("Rp 150000")), "0");
        assert_eq!(
            format_currency(Some("123456789012345678901234")),
            "123.456.789.012.345.678.901.234"
        );
    }

    #[test]
    fn test_format_jakarta_time() {
        assert_eq!(format_jakarta_time(fixed_now()), "5/1/2026, 09.05.03");

        // 跨日
        let late = Utc.with_ymd_and_hms(2026, 10, 19, 20, 30, 0).unwrap();
        assert_eq!(format_jakarta_time(late), "20/10/2026, 03.30.00");
    }
}
