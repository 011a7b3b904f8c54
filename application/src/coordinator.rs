//! Coordinator facade
//!
//! Single entry point wiring the ledger and the two use cases over one
//! store/notifier pair. The CLI (and embedding applications) talk to this
//! type instead of constructing use cases by hand.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use teamvote_domain::{Decision, InviteSession, ResponseLink, ResponseValue, SessionState};

use crate::ledger::SessionLedger;
use crate::ports::notifier::Notifier;
use crate::ports::vote_store::VoteStore;
use crate::use_cases::create_session::{
    CreateSessionError, CreateSessionInput, CreateSessionUseCase,
};
use crate::use_cases::submit_response::{RetryPolicy, SubmitError, SubmitResponseUseCase};

/// Read-only projection of a session's durable view, for operator tooling
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub invite_id: String,
    pub team_id: String,
    pub tournament_id: String,
    pub roster: Vec<String>,
    pub responses: BTreeMap<String, ResponseValue>,
    pub state: SessionState,
    pub decision: Decision,
}

/// The invite response coordinator
///
/// Owns the in-process session ledger and shares the durable store and
/// notifier with its use cases. One instance per process; the ledger is a
/// cache, so several instances over the same store stay correct as long as
/// all events for a given `invite_id` are routed to one of them.
pub struct InviteCoordinator<S: VoteStore, N: Notifier> {
    create: CreateSessionUseCase<S, N>,
    submit: SubmitResponseUseCase<S>,
    store: Arc<S>,
    ledger: Arc<SessionLedger>,
}

impl<S: VoteStore, N: Notifier> InviteCoordinator<S, N> {
    pub fn new(store: Arc<S>, notifier: Arc<N>, link: ResponseLink) -> Self {
        Self::with_retry(store, notifier, link, RetryPolicy::default())
    }

    pub fn with_retry(
        store: Arc<S>,
        notifier: Arc<N>,
        link: ResponseLink,
        retry: RetryPolicy,
    ) -> Self {
        let ledger = Arc::new(SessionLedger::new());
        Self {
            create: CreateSessionUseCase::new(
                Arc::clone(&store),
                notifier,
                Arc::clone(&ledger),
                link,
            ),
            submit: SubmitResponseUseCase::new(Arc::clone(&store), Arc::clone(&ledger))
                .with_retry(retry),
            store,
            ledger,
        }
    }

    /// Create a session and dispatch response links to every roster member
    pub async fn create_session(
        &self,
        input: CreateSessionInput,
    ) -> Result<(), CreateSessionError> {
        self.create.execute(input).await
    }

    /// Ingest one member response and return the session's outcome
    pub async fn submit_response(
        &self,
        invite_id: &str,
        member: &str,
        value: ResponseValue,
    ) -> Result<Decision, SubmitError> {
        self.submit.execute(invite_id, member, value).await
    }

    /// The durable view of a session, with the decision the evaluator
    /// would reach on the current snapshot
    ///
    /// Purely a read: consults the store directly and mutates nothing, so
    /// it is safe to call concurrently with submissions.
    pub async fn status(&self, invite_id: &str) -> Result<SessionStatus, SubmitError> {
        let shell = self
            .store
            .load_session(invite_id)
            .await?
            .ok_or_else(|| SubmitError::UnknownSession(invite_id.to_string()))?;
        let responses = self.store.list_responses(invite_id).await?;

        let session = InviteSession::rehydrate(
            shell.invite_id,
            shell.team_id,
            shell.tournament_id,
            shell.roster,
            responses.into_iter().map(|r| (r.member, r.value)),
            shell.state,
        )
        .map_err(|e| {
            SubmitError::Persistence(crate::ports::vote_store::StoreError::Corrupt(e.to_string()))
        })?;

        let decision = session
            .final_outcome()
            .unwrap_or_else(|| Decision::evaluate(&session));

        Ok(SessionStatus {
            invite_id: session.invite_id().to_string(),
            team_id: session.team_id().to_string(),
            tournament_id: session.tournament_id().to_string(),
            roster: session.roster().iter().cloned().collect(),
            responses: session.responses().clone(),
            state: session.state(),
            decision,
        })
    }

    /// Number of sessions currently cached in the ledger
    pub fn cached_sessions(&self) -> usize {
        self.ledger.len()
    }
}
