//! The aggregation rule that turns collected responses into a team decision

use serde::{Deserialize, Serialize};

use crate::invite::response::ResponseValue;
use crate::invite::session::InviteSession;

/// Outcome of evaluating a session's current response snapshot
///
/// Serializes to the wire shape callers see:
/// `{"status":"pending","outstanding":2}`, `{"status":"accepted"}`,
/// `{"status":"declined"}`.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use teamvote_domain::{Decision, InviteSession, ResponseValue};
///
/// let roster: BTreeSet<String> = ["a@x.com", "b@x.com"].iter().map(|m| m.to_string()).collect();
/// let mut session = InviteSession::new("reg-1", "team-1", "cup-1", roster).unwrap();
///
/// session.record_response("a@x.com", ResponseValue::Accept).unwrap();
/// assert_eq!(Decision::evaluate(&session), Decision::Pending { outstanding: 1 });
///
/// session.record_response("a@x.com", ResponseValue::Decline).unwrap();
/// assert_eq!(Decision::evaluate(&session), Decision::Declined);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Decision {
    /// No decline yet, but not every member has responded
    Pending { outstanding: usize },
    /// Every roster member's latest value is `accept`
    Accepted,
    /// At least one recorded value is `decline`
    Declined,
}

impl Decision {
    /// Apply the aggregation rule to the current snapshot of responses
    ///
    /// Deterministic and history-free: only the latest value per member
    /// matters, and insertion order is irrelevant.
    ///
    /// 1. Any `decline` on file decides the session immediately — one
    ///    decline rejects the team without waiting for the rest of the
    ///    roster (short-circuit).
    /// 2. Otherwise, if every roster member has responded (all values are
    ///    necessarily `accept` at this point), the team is accepted.
    /// 3. Otherwise the session stays pending.
    pub fn evaluate(session: &InviteSession) -> Decision {
        let any_decline = session
            .responses()
            .values()
            .any(|v| *v == ResponseValue::Decline);

        if any_decline {
            return Decision::Declined;
        }

        if session.responses().len() == session.roster().len() {
            return Decision::Accepted;
        }

        Decision::Pending {
            outstanding: session.outstanding(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Decision::Pending { .. })
    }

    /// Human-readable summary used by the CLI and notification bodies
    pub fn summary(&self) -> String {
        match self {
            Decision::Pending { outstanding } => {
                format!("pending ({} response(s) outstanding)", outstanding)
            }
            Decision::Accepted => "accepted (all members accepted)".to_string(),
            Decision::Declined => "declined (a member declined)".to_string(),
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}
