//! Port definitions (interfaces to external collaborators)
//!
//! Ports define how the application layer talks to the durable vote store
//! and the message notifier. Implementations (adapters) live in the
//! infrastructure layer.

pub mod notifier;
pub mod vote_store;
