//! Invite session entity and its state machine

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::invite::decision::Decision;
use crate::invite::response::ResponseValue;

/// Lifecycle state of an invite session
///
/// The state is monotonic: once a session leaves `Open` it never returns,
/// and no transition leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Still collecting responses
    Open,
    /// Every roster member accepted
    DecidedAccepted,
    /// At least one member declined
    DecidedDeclined,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Open)
    }
}

/// One tournament-join invitation and the responses collected for it (Entity)
///
/// The roster is fixed at creation time and immutable afterwards; responses
/// are always a subset of the roster keyed by member identity. The in-memory
/// `responses` map is a projection of the durable store rows for this
/// `invite_id` — every write path updates both in the same logical operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteSession {
    invite_id: String,
    team_id: String,
    tournament_id: String,
    roster: BTreeSet<String>,
    responses: BTreeMap<String, ResponseValue>,
    state: SessionState,
}

impl InviteSession {
    /// Create a new open session with an empty response map
    ///
    /// Fails with [`DomainError::EmptyRoster`] if the roster has no members.
    pub fn new(
        invite_id: impl Into<String>,
        team_id: impl Into<String>,
        tournament_id: impl Into<String>,
        roster: BTreeSet<String>,
    ) -> Result<Self, DomainError> {
        if roster.is_empty() {
            return Err(DomainError::EmptyRoster);
        }

        Ok(Self {
            invite_id: invite_id.into(),
            team_id: team_id.into(),
            tournament_id: tournament_id.into(),
            roster,
            responses: BTreeMap::new(),
            state: SessionState::Open,
        })
    }

    pub fn invite_id(&self) -> &str {
        &self.invite_id
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    pub fn tournament_id(&self) -> &str {
        &self.tournament_id
    }

    pub fn roster(&self) -> &BTreeSet<String> {
        &self.roster
    }

    pub fn responses(&self) -> &BTreeMap<String, ResponseValue> {
        &self.responses
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_member(&self, member: &str) -> bool {
        self.roster.contains(member)
    }

    /// Number of roster members with no response on file yet
    pub fn outstanding(&self) -> usize {
        self.roster.len() - self.responses.len()
    }

    /// Record (or overwrite) a member's response
    ///
    /// Last-write-wins: a member responding twice with different values
    /// simply replaces their earlier vote. Responses from identities outside
    /// the roster are rejected, never silently dropped.
    pub fn record_response(
        &mut self,
        member: &str,
        value: ResponseValue,
    ) -> Result<(), DomainError> {
        if !self.is_member(member) {
            return Err(DomainError::NotAMember(member.to_string()));
        }

        self.responses.insert(member.to_string(), value);
        Ok(())
    }

    /// Transition into the terminal state matching a terminal decision
    ///
    /// Refuses to leave a terminal state, and refuses a `Pending` decision.
    pub fn decide(&mut self, decision: &Decision) -> Result<(), DomainError> {
        if self.state.is_terminal() {
            return Err(DomainError::AlreadyDecided);
        }

        self.state = match decision {
            Decision::Accepted => SessionState::DecidedAccepted,
            Decision::Declined => SessionState::DecidedDeclined,
            Decision::Pending { .. } => return Err(DomainError::AlreadyDecided),
        };
        Ok(())
    }

    /// Roll a terminal transition back to `Open`
    ///
    /// Only the outcome-persistence failure path uses this: if the
    /// registration record could not be written, the session must remain
    /// re-evaluable so a later submission retries.
    pub fn revert_to_open(&mut self) {
        self.state = SessionState::Open;
    }

    /// The final outcome of a decided session, if any
    pub fn final_outcome(&self) -> Option<Decision> {
        match self.state {
            SessionState::Open => None,
            SessionState::DecidedAccepted => Some(Decision::Accepted),
            SessionState::DecidedDeclined => Some(Decision::Declined),
        }
    }

    /// Rebuild a session from its durable parts (rehydration after restart)
    ///
    /// The responses are filtered against the roster so a stray store row
    /// can never widen the membership invariant.
    pub fn rehydrate(
        invite_id: impl Into<String>,
        team_id: impl Into<String>,
        tournament_id: impl Into<String>,
        roster: BTreeSet<String>,
        responses: impl IntoIterator<Item = (String, ResponseValue)>,
        state: SessionState,
    ) -> Result<Self, DomainError> {
        let mut session = Self::new(invite_id, team_id, tournament_id, roster)?;
        for (member, value) in responses {
            if session.is_member(&member) {
                session.responses.insert(member, value);
            }
        }
        session.state = state;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(members: &[&str]) -> BTreeSet<String> {
        members.iter().map(|m| m.to_string()).collect()
    }

    fn session(members: &[&str]) -> InviteSession {
        InviteSession::new("reg-1", "team-1", "cup-1", roster(members)).unwrap()
    }

    #[test]
    fn test_empty_roster_rejected() {
        let result = InviteSession::new("reg-1", "team-1", "cup-1", BTreeSet::new());
        assert_eq!(result.err(), Some(DomainError::EmptyRoster));
    }

    #[test]
    fn test_record_response_for_member() {
        let mut session = session(&["a@x.com", "b@x.com"]);
        session.record_response("a@x.com", ResponseValue::Accept).unwrap();

        assert_eq!(session.responses().get("a@x.com"), Some(&ResponseValue::Accept));
        assert_eq!(session.outstanding(), 1);
    }

    #[test]
    fn test_record_response_rejects_non_member() {
        let mut session = session(&["a@x.com"]);
        let result = session.record_response("intruder@x.com", ResponseValue::Accept);

        assert_eq!(result.err(), Some(DomainError::NotAMember("intruder@x.com".to_string())));
        assert!(session.responses().is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut session = session(&["a@x.com", "b@x.com"]);
        session.record_response("a@x.com", ResponseValue::Accept).unwrap();
        session.record_response("a@x.com", ResponseValue::Decline).unwrap();

        assert_eq!(session.responses().get("a@x.com"), Some(&ResponseValue::Decline));
        assert_eq!(session.responses().len(), 1);
    }

    #[test]
    fn test_decide_is_monotonic() {
        let mut session = session(&["a@x.com"]);
        session.decide(&Decision::Accepted).unwrap();

        assert_eq!(session.state(), SessionState::DecidedAccepted);
        assert_eq!(session.decide(&Decision::Declined).err(), Some(DomainError::AlreadyDecided));
        assert_eq!(session.state(), SessionState::DecidedAccepted);
    }

    #[test]
    fn test_decide_rejects_pending() {
        let mut session = session(&["a@x.com"]);
        let result = session.decide(&Decision::Pending { outstanding: 1 });
        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Open);
    }

    #[test]
    fn test_revert_to_open() {
        let mut session = session(&["a@x.com"]);
        session.decide(&Decision::Declined).unwrap();
        session.revert_to_open();

        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(session.final_outcome(), None);
    }

    #[test]
    fn test_rehydrate_filters_stray_rows() {
        let session = InviteSession::rehydrate(
            "reg-1",
            "team-1",
            "cup-1",
            roster(&["a@x.com"]),
            vec![
                ("a@x.com".to_string(), ResponseValue::Accept),
                ("ghost@x.com".to_string(), ResponseValue::Decline),
            ],
            SessionState::Open,
        )
        .unwrap();

        assert_eq!(session.responses().len(), 1);
        assert!(!session.responses().contains_key("ghost@x.com"));
    }
}
