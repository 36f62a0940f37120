use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    ProviderError { provider: String, message: String },

    #[error("Unauthorized - invalid API key")]
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Authorization,
    Provider,
    System,
}

impl NotifyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NotifyError::ConfigError { .. }
            | NotifyError::MissingConfigError { .. }
            | NotifyError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            NotifyError::ValidationError { .. } => ErrorCategory::Validation,
            NotifyError::Unauthorized => ErrorCategory::Authorization,
            NotifyError::ProviderError { .. } | NotifyError::HttpError(_) => {
                ErrorCategory::Provider
            }
            NotifyError::IoError(_) | NotifyError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// 對應的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::Authorization => 401,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            NotifyError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            NotifyError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            NotifyError::HttpError(e) if e.is_timeout() => {
                "The WhatsApp provider did not respond in time".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the environment variables or the TOML configuration file"
            }
            ErrorCategory::Validation => "Make sure the order payload contains invoiceNumber",
            ErrorCategory::Authorization => "Send the configured key in the x-api-key header",
            ErrorCategory::Provider => {
                "Check the provider token, the device connection and the target number"
            }
            ErrorCategory::System => "Retry the request; if it keeps failing inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
