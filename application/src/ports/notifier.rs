//! Notifier port
//!
//! Defines the interface for delivering invitation messages. Delivery is
//! best-effort with no receipt: a member whose message is lost simply never
//! responds. Nothing in the coordinator assumes exactly-once delivery.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during notification delivery
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Delivery to {recipient} failed: {reason}")]
    DeliveryFailed { recipient: String, reason: String },

    #[error("Notifier unavailable: {0}")]
    Unavailable(String),
}

/// Port for outbound member notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a single message; best-effort, no delivery receipt
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifierError>;
}

/// No-op implementation for tests and when notifications are disabled
pub struct NoNotifier;

#[async_trait]
impl Notifier for NoNotifier {
    async fn notify(&self, _recipient: &str, _subject: &str, _body: &str) -> Result<(), NotifierError> {
        Ok(())
    }
}
