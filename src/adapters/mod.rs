// Adapters layer: WhatsApp gateway clients behind the MessageProvider port.

pub mod fonnte;
pub mod webhook;

pub use fonnte::FonnteProvider;
pub use webhook::WebhookProvider;

use serde_json::Value;

/// 依序取第一個非空的文字欄位
pub(crate) fn first_text(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
}

/// 訊息 ID 可能是字串、數字或陣列 (Fonnte 每個 target 一個 id)
pub(crate) fn response_id(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find_map(id_text)
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let ids: Vec<String> = items.iter().filter_map(id_text).collect();
            if ids.is_empty() {
                None
            } else {
                Some(ids.join(","))
            }
        }
        _ => None,
    }
}
