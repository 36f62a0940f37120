use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::NotifyError;

/// 前端送來的訂單資料，只在記憶體中停留一次請求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderPayload {
    #[serde(deserialize_with = "lenient_text")]
    pub invoice_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub product_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub jenis_produk: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub quantity: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sku: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub product_price: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub kurir: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub payment_method: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub voucher: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub total_payment: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub catatan: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub nama_dropshipper: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub nomor_dropshipper: Option<String>,
}

impl OrderPayload {
    /// 從任意 JSON 值解析；非物件一律視為無效訂單
    pub fn from_value(value: serde_json::Value) -> crate::utils::error::Result<Self> {
        if !value.is_object() {
            return Err(NotifyError::ValidationError {
                message: INVALID_ORDER_MESSAGE.to_string(),
            });
        }
        serde_json::from_value(value).map_err(|e| {
            tracing::debug!("Order payload rejected: {}", e);
            NotifyError::ValidationError {
                message: INVALID_ORDER_MESSAGE.to_string(),
            }
        })
    }
}

pub const INVALID_ORDER_MESSAGE: &str = "Invalid order data - invoiceNumber is required";

/// 字串、數字、`true` 轉成文字；null、空字串、`false`、0 視為缺少
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Some(serde_json::Value::Bool(true)) => Some("true".to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Fonnte,
    Webhook,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Fonnte => write!(f, "fonnte"),
            ProviderKind::Webhook => write!(f, "webhook"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = NotifyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fonnte" => Ok(ProviderKind::Fonnte),
            "webhook" => Ok(ProviderKind::Webhook),
            other => Err(NotifyError::InvalidConfigValueError {
                field: "provider".to_string(),
                value: other.to_string(),
                reason: "Supported providers: fonnte, webhook".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub message_id: String,
    pub detail: String,
}

/// 統一的回應格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl NotifyResponse {
    pub fn ok() -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                success: true,
                message: None,
                error: None,
                message_id: None,
            },
        }
    }

    pub fn sent(message_id: String) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                success: true,
                message: Some("WhatsApp notification sent successfully".to_string()),
                error: None,
                message_id: Some(message_id),
            },
        }
    }

    pub fn error(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            body: ResponseBody {
                success: false,
                message: None,
                error: Some(error.into()),
                message_id: None,
            },
        }
    }

    pub fn from_error(err: &NotifyError) -> Self {
        Self::error(err.status_code(), err.to_string())
    }

    pub fn is_success(&self) -> bool {
        self.body.success
    }
}
