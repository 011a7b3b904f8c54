//! Infrastructure layer for teamvote
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading.

pub mod config;
pub mod notify;
pub mod store;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileCoordinatorConfig, FileNotifyConfig, FileStorageConfig};
pub use notify::OutboxNotifier;
#[cfg(feature = "webhook")]
pub use notify::WebhookNotifier;
pub use store::JsonVoteStore;
