use super::AppConfig;
use crate::domain::model::{OrderPayload, ProviderKind};
use crate::utils::error::Result;
use clap::Parser;
use std::io::Read;

#[derive(Debug, Clone, Parser)]
#[command(name = "order-notify")]
#[command(about = "Send a WhatsApp order notification through Fonnte or a custom webhook")]
pub struct CliConfig {
    /// Path to the order JSON file ("-" reads stdin)
    #[arg(short, long)]
    pub order: String,

    /// Path to a TOML configuration file (environment variables are used otherwise)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Provider to send through: fonnte or webhook
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Override the admin phone number that receives the notification
    #[arg(long)]
    pub target: Option<String>,

    /// Override the store name used in the message header and footer
    #[arg(long)]
    pub store_name: Option<String>,

    /// Print the rendered message without sending it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 讀取設定檔或環境變數，再套用命令列覆蓋
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                AppConfig::from_file(path)?
            }
            None => AppConfig::from_env()?,
        };

        if let Some(target) = &self.target {
            config.notification.admin_phone = Some(target.clone());
            tracing::info!("🔧 Target overridden to: {}", target);
        }
        if let Some(store_name) = &self.store_name {
            config.notification.store_name = store_name.clone();
        }

        Ok(config)
    }

    pub fn provider_kind(&self, config: &AppConfig) -> Result<ProviderKind> {
        match &self.provider {
            Some(provider) => provider.parse(),
            None => Ok(config.notification.default_provider),
        }
    }

    pub fn read_order(&self) -> Result<OrderPayload> {
        let content = if self.order == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            std::fs::read_to_string(&self.order)?
        };

        let value: serde_json::Value = serde_json::from_str(&content)?;
        OrderPayload::from_value(value)
    }
}
