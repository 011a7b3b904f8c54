//! Response types for invite sessions
//!
//! This module defines the voting primitives collected from roster members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// A single member's answer to an invitation
///
/// # Example
///
/// ```
/// use teamvote_domain::ResponseValue;
///
/// let value: ResponseValue = "accept".parse().unwrap();
/// assert!(value.is_accept());
///
/// let value: ResponseValue = "DECLINE".parse().unwrap();
/// assert!(!value.is_accept());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseValue {
    /// Member wants the team to take the slot
    Accept,
    /// Member opts the team out
    Decline,
}

impl ResponseValue {
    pub fn is_accept(&self) -> bool {
        matches!(self, ResponseValue::Accept)
    }

    /// The wire form used in response links and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseValue::Accept => "accept",
            ResponseValue::Decline => "decline",
        }
    }
}

impl std::fmt::Display for ResponseValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResponseValue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accept" => Ok(ResponseValue::Accept),
            "decline" => Ok(ResponseValue::Decline),
            other => Err(DomainError::InvalidResponseValue(other.to_string())),
        }
    }
}

/// The durable record of one member's latest response
///
/// `(invite_id, member)` is the unique key; writing a record for an existing
/// key overwrites the previous one (last-write-wins). The store keeps no
/// history — a member who changes their mind simply replaces their row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Session this response belongs to
    pub invite_id: String,
    /// Member identity (e.g. an email address)
    pub member: String,
    /// The latest value for this member
    pub value: ResponseValue,
    /// Timestamp of the last write
    pub responded_at: DateTime<Utc>,
}

impl ResponseRecord {
    /// Create a record stamped with the current UTC time
    pub fn new(
        invite_id: impl Into<String>,
        member: impl Into<String>,
        value: ResponseValue,
    ) -> Self {
        Self {
            invite_id: invite_id.into(),
            member: member.into(),
            value,
            responded_at: Utc::now(),
        }
    }
}
