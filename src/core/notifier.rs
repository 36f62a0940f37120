use crate::core::message::{format_order_message, DEFAULT_STORE_NAME};
use crate::core::phone::normalize_phone;
use crate::domain::model::{NotifyResponse, OrderPayload, SendOutcome, INVALID_ORDER_MESSAGE};
use crate::domain::ports::MessageProvider;
use crate::utils::error::{ErrorCategory, NotifyError, Result};
use crate::utils::validation::validate_required_field;
use chrono::Utc;

const SEND_FAILED_MESSAGE: &str = "Failed to send WhatsApp message";

/// 驗證 → 格式化 → 發送 → 對應成統一回應
#[derive(Debug, Clone)]
pub struct OrderNotifier {
    admin_phone: Option<String>,
    store_name: String,
}

impl OrderNotifier {
    pub fn new(admin_phone: Option<String>, store_name: impl Into<String>) -> Self {
        Self {
            admin_phone,
            store_name: store_name.into(),
        }
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// 只渲染訊息，不發送
    pub fn render(&self, order: &OrderPayload) -> Result<String> {
        validate_order(order)?;
        Ok(format_order_message(order, &self.store_name, Utc::now()))
    }

    pub async fn try_notify(
        &self,
        provider: &dyn MessageProvider,
        order: &OrderPayload,
    ) -> Result<SendOutcome> {
        let message = self.render(order)?;
        let target = self.target()?;

        tracing::debug!(
            "Sending {} chars via {} to {}",
            message.chars().count(),
            provider.kind(),
            target
        );

        let outcome = provider.send(&target, &message).await?;
        tracing::debug!("Provider detail: {}", outcome.detail);
        Ok(outcome)
    }

    pub async fn notify(
        &self,
        provider: &dyn MessageProvider,
        order: &OrderPayload,
    ) -> NotifyResponse {
        let invoice = order.invoice_number.as_deref().unwrap_or("-");

        match self.try_notify(provider, order).await {
            Ok(outcome) => {
                tracing::info!(
                    "✅ Order {} sent via {} (id: {})",
                    invoice,
                    provider.kind(),
                    outcome.message_id
                );
                NotifyResponse::sent(outcome.message_id)
            }
            Err(e) => {
                let response = error_response(&e);
                tracing::error!(
                    "❌ Order {} not sent via {}: {} (Category: {:?}, status {})",
                    invoice,
                    provider.kind(),
                    e,
                    e.category(),
                    response.status_code
                );
                tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                response
            }
        }
    }

    fn target(&self) -> Result<String> {
        let raw = validate_required_field("notification.admin_phone", &self.admin_phone)?;

        let target = normalize_phone(raw);
        if target.is_empty() {
            return Err(NotifyError::InvalidConfigValueError {
                field: "notification.admin_phone".to_string(),
                value: raw.to_string(),
                reason: "Phone number must contain digits".to_string(),
            });
        }
        Ok(target)
    }
}

impl Default for OrderNotifier {
    fn default() -> Self {
        Self::new(None, DEFAULT_STORE_NAME)
    }
}

fn validate_order(order: &OrderPayload) -> Result<()> {
    match order.invoice_number.as_deref() {
        Some(invoice) if !invoice.trim().is_empty() => Ok(()),
        _ => Err(NotifyError::ValidationError {
            message: INVALID_ORDER_MESSAGE.to_string(),
        }),
    }
}

/// 錯誤訊息原樣回傳給呼叫端
pub fn error_response(err: &NotifyError) -> NotifyResponse {
    match err {
        NotifyError::ProviderError { message, .. } if message.trim().is_empty() => {
            NotifyResponse::error(500, SEND_FAILED_MESSAGE)
        }
        e if e.category() == ErrorCategory::System => {
            NotifyResponse::error(500, format!("Internal server error: {}", e))
        }
        e => NotifyResponse::from_error(e),
    }
}
