//! Submit response use case (response collector + decision evaluator)
//!
//! Ingests one inbound response event: validates it against the session,
//! records it durably and in the ledger in the same logical operation, and
//! re-runs the decision rule. Terminal outcomes are persisted against the
//! registration record before they are reported to anyone.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use teamvote_domain::{Decision, InviteSession, ResponseRecord, ResponseValue};

use crate::ledger::SessionLedger;
use crate::ports::vote_store::{RegistrationStatus, StoreError, VoteStore};

/// Errors that can occur during response submission
#[derive(Error, Debug)]
pub enum SubmitError {
    /// No session with this id in the ledger or the durable store.
    /// Surfaced to the clicking party as "invalid link".
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// The responding identity is outside the session's roster. Also
    /// surfaced as "invalid link" — never silently ignored, so roster
    /// configuration bugs stay visible.
    #[error("{member} is not a member of session {invite_id}")]
    NotAMember { invite_id: String, member: String },

    /// The durable write failed after retries; any state transition has
    /// been reverted and the event can be retried externally.
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Bounded retry with doubling backoff for the terminal-persistence path
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

/// Use case for ingesting a member's response
pub struct SubmitResponseUseCase<S: VoteStore> {
    store: Arc<S>,
    ledger: Arc<SessionLedger>,
    retry: RetryPolicy,
}

impl<S: VoteStore> SubmitResponseUseCase<S> {
    pub fn new(store: Arc<S>, ledger: Arc<SessionLedger>) -> Self {
        Self {
            store,
            ledger,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Execute the use case
    ///
    /// All work happens under the per-session slot lock, so two concurrent
    /// submissions for the same `invite_id` are linearized: the second
    /// observes the first's effect, and at most one of them performs the
    /// terminal transition. Submissions for different sessions do not
    /// block each other.
    pub async fn execute(
        &self,
        invite_id: &str,
        member: &str,
        value: ResponseValue,
    ) -> Result<Decision, SubmitError> {
        let slot = self.ledger.slot(invite_id);
        let mut guard = slot.lock().await;

        if guard.is_none() {
            match self.rehydrate(invite_id).await? {
                Some(session) => *guard = Some(session),
                None => {
                    // Don't leave an empty slot behind for an id that was
                    // never created.
                    drop(guard);
                    self.ledger.evict(invite_id);
                    return Err(SubmitError::UnknownSession(invite_id.to_string()));
                }
            }
        }
        let session = guard.as_mut().expect("slot populated above");

        // Membership is validated before any mutation.
        if !session.is_member(member) {
            return Err(SubmitError::NotAMember {
                invite_id: invite_id.to_string(),
                member: member.to_string(),
            });
        }

        // A late or repeated click after the decision is final still gets
        // its vote recorded durably, but the reported outcome never
        // changes and the evaluator is not re-run.
        if let Some(outcome) = session.final_outcome() {
            let record = ResponseRecord::new(invite_id, member, value);
            self.store.upsert_response(&record).await?;
            session
                .record_response(member, value)
                .expect("membership checked above");
            debug!(
                "Late response from {} for decided session {}",
                member, invite_id
            );
            // The rehydration above pulled the decided session back into
            // the ledger; retire it again so late traffic never grows the
            // cache.
            drop(guard);
            self.ledger.evict(invite_id);
            return Ok(outcome);
        }

        // Durable row first, then the in-memory mirror: the two are updated
        // in the same logical operation and must never diverge. A failed
        // upsert leaves no side effect anywhere.
        let record = ResponseRecord::new(invite_id, member, value);
        self.store.upsert_response(&record).await?;
        session
            .record_response(member, value)
            .expect("membership checked above");

        let decision = Decision::evaluate(session);
        if !decision.is_terminal() {
            return Ok(decision);
        }

        session.decide(&decision).expect("state is open");

        if let Err(e) = self.persist_outcome(session, &decision).await {
            // The vote itself stays durably recorded; only the transition
            // is rolled back so a later submission retries the decision.
            warn!(
                "Could not persist outcome for session {}: {} — reverting to open",
                invite_id, e
            );
            session.revert_to_open();
            return Err(SubmitError::Persistence(e));
        }

        info!("Session {} decided: {}", invite_id, decision);
        drop(guard);
        self.ledger.evict(invite_id);
        Ok(decision)
    }

    /// Rebuild the session from the durable store on a ledger miss
    async fn rehydrate(&self, invite_id: &str) -> Result<Option<InviteSession>, SubmitError> {
        let Some(shell) = self.store.load_session(invite_id).await? else {
            return Ok(None);
        };
        let responses = self.store.list_responses(invite_id).await?;

        debug!(
            "Rehydrated session {} from store ({} response(s) on file)",
            invite_id,
            responses.len()
        );

        let session = InviteSession::rehydrate(
            shell.invite_id,
            shell.team_id,
            shell.tournament_id,
            shell.roster,
            responses.into_iter().map(|r| (r.member, r.value)),
            shell.state,
        )
        .map_err(|e| SubmitError::Persistence(StoreError::Corrupt(e.to_string())))?;

        Ok(Some(session))
    }

    /// Write the final outcome durably, retrying with doubling backoff
    async fn persist_outcome(
        &self,
        session: &InviteSession,
        decision: &Decision,
    ) -> Result<(), StoreError> {
        let status = match decision {
            Decision::Accepted => RegistrationStatus::Registered,
            Decision::Declined => RegistrationStatus::Declined,
            Decision::Pending { .. } => unreachable!("only terminal decisions are persisted"),
        };

        // A zero-attempt policy still tries once
        let attempts = self.retry.attempts.max(1);
        let mut backoff = self.retry.initial_backoff;
        let mut last_err = None;

        for attempt in 1..=attempts {
            let result = async {
                self.store
                    .set_registration_status(session.invite_id(), status)
                    .await?;
                self.store
                    .update_state(session.invite_id(), session.state())
                    .await
            }
            .await;

            match result {
                Ok(()) => return Ok(()),
                Err(e) => {
                    if attempt < attempts {
                        warn!(
                            "Outcome write for {} failed (attempt {}/{}): {}",
                            session.invite_id(),
                            attempt,
                            attempts,
                            e
                        );
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.expect("at least one attempt"))
    }
}
