use super::AppConfig;
use crate::utils::error::{NotifyError, Result};

impl AppConfig {
    /// Lambda 從環境變數讀取設定
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意查詢函式讀取，方便測試時不動到行程環境
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空字串等同未設定
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = AppConfig::default();

        config.notification.admin_phone = var("ADMIN_PHONE");
        config.notification.api_key = var("NOTIFY_API_KEY");
        if let Some(store_name) = var("STORE_NAME") {
            config.notification.store_name = store_name;
        }
        if let Some(origin) = var("CORS_ALLOWED_ORIGIN") {
            config.notification.allowed_origin = origin;
        }
        if let Some(provider) = var("DEFAULT_PROVIDER") {
            config.notification.default_provider = provider.parse()?;
        }

        config.fonnte.token = var("FONNTE_TOKEN");
        if let Some(endpoint) = var("FONNTE_ENDPOINT") {
            config.fonnte.endpoint = endpoint;
        }
        config.fonnte.country_code = var("FONNTE_COUNTRY_CODE");

        config.webhook.url = var("WEBHOOK_URL");
        config.webhook.token = var("WEBHOOK_TOKEN");

        if let Some(timeout) = var("HTTP_TIMEOUT_SECONDS") {
            config.http.timeout_seconds =
                timeout
                    .trim()
                    .parse()
                    .map_err(|_| NotifyError::InvalidConfigValueError {
                        field: "HTTP_TIMEOUT_SECONDS".to_string(),
                        value: timeout.clone(),
                        reason: "Must be a whole number of seconds".to_string(),
                    })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ProviderKind;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_all_settings() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ADMIN_PHONE", "089675712795"),
            ("NOTIFY_API_KEY", "caller-key"),
            ("STORE_NAME", "Toko Hikmah"),
            ("CORS_ALLOWED_ORIGIN", "https://shop.example.com"),
            ("DEFAULT_PROVIDER", "webhook"),
            ("FONNTE_TOKEN", "fonnte-token"),
            ("FONNTE_ENDPOINT", "https://fonnte.example.com/send"),
            ("FONNTE_COUNTRY_CODE", "62"),
            ("WEBHOOK_URL", "https://hooks.example.com/wa"),
            ("WEBHOOK_TOKEN", "hook-token"),
            ("HTTP_TIMEOUT_SECONDS", "10"),
        ]))
        .unwrap();

        assert_eq!(config.notification.admin_phone.as_deref(), Some("089675712795"));
        assert_eq!(config.notification.api_key.as_deref(), Some("caller-key"));
        assert_eq!(config.notification.store_name, "Toko Hikmah");
        assert_eq!(config.notification.allowed_origin, "https://shop.example.com");
        assert_eq!(config.notification.default_provider, ProviderKind::Webhook);
        assert_eq!(config.fonnte.token.as_deref(), Some("fonnte-token"));
        assert_eq!(config.fonnte.endpoint, "https://fonnte.example.com/send");
        assert_eq!(config.fonnte.country_code.as_deref(), Some("62"));
        assert_eq!(config.webhook.url.as_deref(), Some("https://hooks.example.com/wa"));
        assert_eq!(config.webhook.token.as_deref(), Some("hook-token"));
        assert_eq!(config.http.timeout_seconds, 10);
    }

    #[test]
    fn test_from_lookup_defaults_and_blank_values() {
        let config =
            AppConfig::from_lookup(lookup(&[("FONNTE_TOKEN", "  "), ("ADMIN_PHONE", "")]))
                .unwrap();

        assert!(config.fonnte.token.is_none());
        assert!(config.notification.admin_phone.is_none());
        assert_eq!(config.fonnte.endpoint, crate::config::DEFAULT_FONNTE_ENDPOINT);
        assert_eq!(config.notification.default_provider, ProviderKind::Fonnte);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[("HTTP_TIMEOUT_SECONDS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("DEFAULT_PROVIDER", "twilio")])).is_err());
    }
}
