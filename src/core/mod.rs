pub mod message;
pub mod notifier;
pub mod phone;

pub use crate::domain::model::{NotifyResponse, OrderPayload, ProviderKind, SendOutcome};
pub use crate::domain::ports::MessageProvider;
pub use crate::utils::error::Result;
