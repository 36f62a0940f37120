pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FonnteProvider, WebhookProvider};
pub use app::{HttpRequest, HttpResponse, NotifyRouter};
pub use config::AppConfig;
pub use crate::core::notifier::OrderNotifier;
pub use domain::model::{NotifyResponse, OrderPayload, ProviderKind};
pub use utils::error::{NotifyError, Result};
