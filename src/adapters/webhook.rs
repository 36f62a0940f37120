use crate::adapters::{first_text, response_id};
use crate::config::WebhookConfig;
use crate::domain::model::{ProviderKind, SendOutcome};
use crate::domain::ports::MessageProvider;
use crate::utils::error::{NotifyError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// 自訂 webhook：JSON body，Bearer token
pub struct WebhookProvider {
    client: Client,
    url: String,
    token: Option<String>,
    timeout: Duration,
}

impl WebhookProvider {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            token,
            timeout,
        }
    }

    /// 沒有 URL 就視為未設定
    pub fn from_config(config: &WebhookConfig, timeout: Duration) -> Option<Self> {
        let url = config.url.as_ref()?;
        Some(Self::new(url.clone(), config.token.clone(), timeout))
    }
}

/// 2xx 但 body 明確標示失敗
fn rejected_by_body(body: &Value) -> bool {
    body.get("success") == Some(&Value::Bool(false)) || body.get("status") == Some(&Value::Bool(false))
}

#[async_trait]
impl MessageProvider for WebhookProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Webhook
    }

    async fn send(&self, target: &str, message: &str) -> Result<SendOutcome> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&json!({ "target": target, "message": message }))
            .timeout(self.timeout);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("📡 POST {} (target {})", self.url, target);
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        // 空 body 或非 JSON 時只看 HTTP 狀態
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        tracing::debug!("Webhook response: HTTP {} {}", status.as_u16(), body);

        if status.is_success() && !rejected_by_body(&body) {
            return Ok(SendOutcome {
                message_id: response_id(&body, &["messageId", "message_id", "id"])
                    .unwrap_or_else(|| "sent".to_string()),
                detail: first_text(&body, &["message", "detail"])
                    .unwrap_or_else(|| "Message sent successfully".to_string()),
            });
        }

        Err(NotifyError::ProviderError {
            provider: ProviderKind::Webhook.to_string(),
            message: first_text(&body, &["error", "message", "reason", "detail"])
                .unwrap_or_else(|| format!("Webhook returned HTTP {}", status.as_u16())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_send_posts_json_with_bearer_token() {
        let server = MockServer::start();

        let hook_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/hooks/wa")
                .header("authorization", "Bearer hook-token")
                .json_body(json!({"target": "6289675712795", "message": "Pesanan baru"}));
            then.status(200)
                .json_body(json!({"success": true, "messageId": "wamid.HBgL"}));
        });

        let provider = WebhookProvider::new(
            server.url("/hooks/wa"),
            Some("hook-token".to_string()),
            Duration::from_secs(5),
        );

        let outcome = provider.send("6289675712795", "Pesanan baru").await.unwrap();

        hook_mock.assert();
        assert_eq!(outcome.message_id, "wamid.HBgL");
    }

    #[tokio::test]
    async fn test_send_without_token_and_empty_body() {
        let server = MockServer::start();

        let hook_mock = server.mock(|when, then| {
            when.method(POST).path("/hooks/wa");
            then.status(204);
        });

        let config = WebhookConfig {
            url: Some(server.url("/hooks/wa")),
            token: None,
        };
        let provider = WebhookProvider::from_config(&config, Duration::from_secs(5)).unwrap();

        let outcome = provider.send("62812", "hi").await.unwrap();

        hook_mock.assert();
        assert_eq!(outcome.message_id, "sent");
        assert_eq!(outcome.detail, "Message sent successfully");
    }

    #[tokio::test]
    async fn test_http_error_uses_body_error() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/hooks/wa");
            then.status(401).json_body(json!({"error": "invalid token"}));
        });

        let provider = WebhookProvider::new(server.url("/hooks/wa"), None, Duration::from_secs(5));
        let err = provider.send("62812", "hi").await.unwrap_err();

        assert!(matches!(err, NotifyError::ProviderError { .. }));
        assert_eq!(err.to_string(), "invalid token");
    }

    #[tokio::test]
    async fn test_http_error_without_body() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/hooks/wa");
            then.status(503);
        });

        let provider = WebhookProvider::new(server.url("/hooks/wa"), None, Duration::from_secs(5));
        let err = provider.send("62812", "hi").await.unwrap_err();

        assert_eq!(err.to_string(), "Webhook returned HTTP 503");
    }

    #[tokio::test]
    async fn test_success_status_with_failure_body() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(POST).path("/hooks/wa");
            then.status(200)
                .json_body(json!({"success": false, "message": "number not on WhatsApp"}));
        });

        let provider = WebhookProvider::new(server.url("/hooks/wa"), None, Duration::from_secs(5));
        let err = provider.send("62812", "hi").await.unwrap_err();

        assert_eq!(err.to_string(), "number not on WhatsApp");
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_transport_error() {
        // 綁定後立即釋放，確保該埠沒有服務
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let provider = WebhookProvider::new(
            format!("http://127.0.0.1:{}/send", port),
            None,
            Duration::from_secs(2),
        );

        let err = provider.send("628123", "hello").await.unwrap_err();

        assert!(matches!(err, NotifyError::HttpError(_)));
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Provider);

        let response = crate::core::notifier::error_response(&err);
        assert_eq!(response.status_code, 500);
        assert!(response
            .body
            .error
            .as_deref()
            .unwrap()
            .starts_with("HTTP request failed: "));
    }

    #[test]
    fn test_from_config_requires_url() {
        assert!(
            WebhookProvider::from_config(&WebhookConfig::default(), Duration::from_secs(5))
                .is_none()
        );
    }
}
