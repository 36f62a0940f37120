#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::message::DEFAULT_STORE_NAME;
use crate::domain::model::ProviderKind;
use crate::utils::error::Result;
use crate::utils::error::NotifyError;
use crate::utils::validation::{
    validate_non_empty_string, validate_phone, validate_range, validate_required_field,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FONNTE_ENDPOINT: &str = "https://api.fonnte.com/send";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub fonnte: FonnteConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 接收通知的管理員號碼
    pub admin_phone: Option<String>,
    #[serde(default = "default_store_name")]
    pub store_name: String,
    /// 設定後呼叫端必須帶 x-api-key
    pub api_key: Option<String>,
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
    #[serde(default = "default_provider")]
    pub default_provider: ProviderKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FonnteConfig {
    pub token: Option<String>,
    #[serde(default = "default_fonnte_endpoint")]
    pub endpoint: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_store_name() -> String {
    DEFAULT_STORE_NAME.to_string()
}

fn default_allowed_origin() -> String {
    "*".to_string()
}

fn default_provider() -> ProviderKind {
    ProviderKind::Fonnte
}

fn default_fonnte_endpoint() -> String {
    DEFAULT_FONNTE_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            admin_phone: None,
            store_name: default_store_name(),
            api_key: None,
            allowed_origin: default_allowed_origin(),
            default_provider: default_provider(),
        }
    }
}

impl Default for FonnteConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: default_fonnte_endpoint(),
            country_code: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http.timeout_seconds)
    }

    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        match kind {
            ProviderKind::Fonnte => self.fonnte.token.is_some(),
            ProviderKind::Webhook => self.webhook.url.is_some(),
        }
    }

    /// 發送前檢查：管理員號碼與指定的發送服務都要有設定
    pub fn ensure_ready(&self, kind: ProviderKind) -> Result<()> {
        validate_required_field("notification.admin_phone", &self.notification.admin_phone)?;
        if !self.is_configured(kind) {
            return Err(NotifyError::MissingConfigError {
                field: match kind {
                    ProviderKind::Fonnte => "fonnte.token".to_string(),
                    ProviderKind::Webhook => "webhook.url".to_string(),
                },
            });
        }
        Ok(())
    }

    /// 給日誌用的摘要，不含任何 token
    pub fn summary(&self) -> String {
        format!(
            "store='{}', admin_phone={}, default_provider={}, fonnte={}, webhook={}, api_key={}, timeout={}s",
            self.notification.store_name,
            if self.notification.admin_phone.is_some() { "set" } else { "missing" },
            self.notification.default_provider,
            if self.is_configured(ProviderKind::Fonnte) { "configured" } else { "off" },
            if self.is_configured(ProviderKind::Webhook) { "configured" } else { "off" },
            if self.notification.api_key.is_some() { "required" } else { "disabled" },
            self.http.timeout_seconds,
        )
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        // 缺少的發送設定在請求時才回 500，這裡只檢查已填寫的值
        validate_non_empty_string("notification.store_name", &self.notification.store_name)?;
        validate_non_empty_string(
            "notification.allowed_origin",
            &self.notification.allowed_origin,
        )?;

        if let Some(phone) = &self.notification.admin_phone {
            validate_phone("notification.admin_phone", phone)?;
        }
        if let Some(api_key) = &self.notification.api_key {
            validate_non_empty_string("notification.api_key", api_key)?;
        }

        validate_url("fonnte.endpoint", &self.fonnte.endpoint)?;
        if let Some(token) = &self.fonnte.token {
            validate_non_empty_string("fonnte.token", token)?;
        }

        if let Some(url) = &self.webhook.url {
            validate_url("webhook.url", url)?;
        }

        validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 300)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}
