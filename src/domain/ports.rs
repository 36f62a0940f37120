use crate::domain::model::{ProviderKind, SendOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

/// WhatsApp 發送服務的介面，Fonnte 與自訂 webhook 可互換
#[async_trait]
pub trait MessageProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// `target` 已經是正規化後的號碼 (62xxx)
    async fn send(&self, target: &str, message: &str) -> Result<SendOutcome>;
}
