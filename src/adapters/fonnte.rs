use crate::adapters::{first_text, response_id};
use crate::config::FonnteConfig;
use crate::domain::model::{ProviderKind, SendOutcome};
use crate::domain::ports::MessageProvider;
use crate::utils::error::{NotifyError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fonnte (api.fonnte.com)：token 直接放在 Authorization，表單編碼
pub struct FonnteProvider {
    client: Client,
    endpoint: String,
    token: String,
    country_code: Option<String>,
    timeout: Duration,
}

impl FonnteProvider {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
            country_code: None,
            timeout,
        }
    }

    /// 沒有 token 就視為未設定
    pub fn from_config(config: &FonnteConfig, timeout: Duration) -> Option<Self> {
        let token = config.token.as_ref()?;
        let mut provider = Self::new(config.endpoint.clone(), token.clone(), timeout);
        provider.country_code = config.country_code.clone();
        Some(provider)
    }

    fn provider_error(message: impl Into<String>) -> NotifyError {
        NotifyError::ProviderError {
            provider: ProviderKind::Fonnte.to_string(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl MessageProvider for FonnteProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Fonnte
    }

    async fn send(&self, target: &str, message: &str) -> Result<SendOutcome> {
        let mut form = vec![("target", target), ("message", message)];
        if let Some(country_code) = &self.country_code {
            form.push(("countryCode", country_code.as_str()));
        }

        tracing::debug!("📡 POST {} (target {})", self.endpoint, target);
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, &self.token)
            .form(&form)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let result: serde_json::Value = serde_json::from_str(&text).map_err(|_| {
            Self::provider_error(format!(
                "Fonnte returned HTTP {} with a non-JSON body",
                status.as_u16()
            ))
        })?;

        tracing::debug!("Fonnte response: {}", result);

        let accepted = match result.get("status") {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        };

        if accepted {
            Ok(SendOutcome {
                message_id: response_id(&result, &["id", "message_id"])
                    .unwrap_or_else(|| "sent".to_string()),
                detail: first_text(&result, &["detail"])
                    .unwrap_or_else(|| "Message sent successfully".to_string()),
            })
        } else {
            Err(Self::provider_error(
                first_text(&result, &["reason", "message", "detail"])
                    .unwrap_or_else(|| "Failed to send via Fonnte API".to_string()),
            ))
        }
    }
}
