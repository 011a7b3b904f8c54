//! Domain layer for teamvote
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Invite Session
//!
//! An invite session is the aggregation unit for one tournament-join
//! invitation: a fixed roster of member identities, the responses collected
//! so far, and a monotonic state that ends in exactly one of two terminal
//! decisions.
//!
//! ## Decision Rule
//!
//! - A single `decline` decides the session immediately (short-circuit)
//! - The session is `accepted` only when every roster member has an
//!   `accept` on file
//! - Anything else is `pending`

pub mod core;
pub mod invite;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use invite::{
    decision::Decision,
    link::ResponseLink,
    response::{ResponseRecord, ResponseValue},
    session::{InviteSession, SessionState},
};
