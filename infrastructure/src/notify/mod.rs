//! Notifier adapters

mod outbox;
#[cfg(feature = "webhook")]
mod webhook;

pub use outbox::OutboxNotifier;
#[cfg(feature = "webhook")]
pub use webhook::WebhookNotifier;
