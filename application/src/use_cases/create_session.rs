//! Create session use case (invite dispatcher)
//!
//! Creates an invite session, persists its shell durably, and asks the
//! notifier to deliver a response link to every roster member.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use teamvote_domain::{DomainError, InviteSession, ResponseLink, ResponseValue, SessionState};

use crate::ledger::SessionLedger;
use crate::ports::notifier::Notifier;
use crate::ports::vote_store::{SessionShell, StoreError, VoteStore};

/// Errors that can occur during session creation
#[derive(Error, Debug)]
pub enum CreateSessionError {
    #[error("Roster must not be empty")]
    EmptyRoster,

    #[error("Session {0} already exists")]
    DuplicateSession(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the CreateSession use case
///
/// `invite_id` is caller-supplied and acts as the idempotency key for the
/// whole session; `team_id` and `tournament_id` are opaque references to
/// external entities.
#[derive(Debug, Clone)]
pub struct CreateSessionInput {
    pub invite_id: String,
    pub team_id: String,
    pub tournament_id: String,
    pub roster: BTreeSet<String>,
}

impl CreateSessionInput {
    pub fn new(
        invite_id: impl Into<String>,
        team_id: impl Into<String>,
        tournament_id: impl Into<String>,
        roster: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            invite_id: invite_id.into(),
            team_id: team_id.into(),
            tournament_id: tournament_id.into(),
            roster: roster.into_iter().collect(),
        }
    }
}

/// Use case for dispatching a new invite session
pub struct CreateSessionUseCase<S: VoteStore, N: Notifier> {
    store: Arc<S>,
    notifier: Arc<N>,
    ledger: Arc<SessionLedger>,
    link: ResponseLink,
}

impl<S: VoteStore, N: Notifier> CreateSessionUseCase<S, N> {
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        ledger: Arc<SessionLedger>,
        link: ResponseLink,
    ) -> Self {
        Self {
            store,
            notifier,
            ledger,
            link,
        }
    }

    /// Execute the use case
    ///
    /// The session shell (roster + open state) is durably persisted before
    /// this returns, so a crash after creation still allows the roster to
    /// be recovered. Individual delivery failures are logged and do not
    /// abort creation — an unreachable member simply never responds.
    pub async fn execute(&self, input: CreateSessionInput) -> Result<(), CreateSessionError> {
        // The only constructor failure is an empty roster
        let session = InviteSession::new(
            &input.invite_id,
            &input.team_id,
            &input.tournament_id,
            input.roster,
        )
        .map_err(|_: DomainError| CreateSessionError::EmptyRoster)?;

        let slot = self.ledger.slot(&input.invite_id);
        let mut guard = slot.lock().await;

        // Creation aborts with no partial session left behind: the id must
        // be unknown to both the ledger and the durable store.
        if guard.is_some() || self.store.load_session(&input.invite_id).await?.is_some() {
            return Err(CreateSessionError::DuplicateSession(input.invite_id));
        }

        let shell = SessionShell {
            invite_id: session.invite_id().to_string(),
            team_id: session.team_id().to_string(),
            tournament_id: session.tournament_id().to_string(),
            roster: session.roster().clone(),
            state: SessionState::Open,
        };
        self.store.create_session(&shell).await.map_err(|e| match e {
            StoreError::DuplicateSession(id) => CreateSessionError::DuplicateSession(id),
            other => CreateSessionError::Store(other),
        })?;

        info!(
            "Created invite session {} for team {} ({} member(s))",
            session.invite_id(),
            session.team_id(),
            session.roster().len()
        );

        for member in session.roster() {
            let subject = format!(
                "Tournament invite for team {}: your response is needed",
                session.team_id()
            );
            let body = self.compose_invite(&session, member);

            if let Err(e) = self.notifier.notify(member, &subject, &body).await {
                warn!("Could not notify {}: {}", member, e);
            }
        }

        *guard = Some(session);
        Ok(())
    }

    /// Message body carrying one accept link and one decline link
    fn compose_invite(&self, session: &InviteSession, member: &str) -> String {
        let accept = self
            .link
            .url(session.invite_id(), member, ResponseValue::Accept);
        let decline = self
            .link
            .url(session.invite_id(), member, ResponseValue::Decline);

        format!(
            "Your team {} has been offered a slot in tournament {}.\n\
             The team is registered only if every member accepts.\n\n\
             Accept:  {}\n\
             Decline: {}\n",
            session.team_id(),
            session.tournament_id(),
            accept,
            decline,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::notifier::NotifierError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::ports::vote_store::MemoryVoteStore;

    /// Notifier that records every message and can fail per recipient
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String, String)>>,
        fail_for: Option<String>,
    }

    impl RecordingNotifier {
        fn failing_for(recipient: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: Some(recipient.to_string()),
            }
        }

        fn sent(&self) -> Vec<(String, String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(
            &self,
            recipient: &str,
            subject: &str,
            body: &str,
        ) -> Result<(), NotifierError> {
            if self.fail_for.as_deref() == Some(recipient) {
                return Err(NotifierError::DeliveryFailed {
                    recipient: recipient.to_string(),
                    reason: "mailbox unavailable".to_string(),
                });
            }
            self.sent.lock().unwrap().push((
                recipient.to_string(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }
    }

    fn use_case(
        store: Arc<MemoryVoteStore>,
        notifier: Arc<RecordingNotifier>,
        ledger: Arc<SessionLedger>,
    ) -> CreateSessionUseCase<MemoryVoteStore, RecordingNotifier> {
        CreateSessionUseCase::new(
            store,
            notifier,
            ledger,
            ResponseLink::new("https://teamvote.example"),
        )
    }

    fn input(invite_id: &str, members: &[&str]) -> CreateSessionInput {
        CreateSessionInput::new(
            invite_id,
            "team-1",
            "cup-1",
            members.iter().map(|m| m.to_string()),
        )
    }

    #[tokio::test]
    async fn test_create_persists_shell_and_notifies_everyone() {
        let store = Arc::new(MemoryVoteStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(SessionLedger::new());

        use_case(store.clone(), notifier.clone(), ledger.clone())
            .execute(input("reg-1", &["a@x.com", "b@x.com"]))
            .await
            .unwrap();

        let shell = store.load_session("reg-1").await.unwrap().unwrap();
        assert_eq!(shell.roster.len(), 2);
        assert_eq!(shell.state, SessionState::Open);
        assert!(ledger.contains("reg-1"));

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].2.contains("value=accept"));
        assert!(sent[0].2.contains("value=decline"));
    }

    #[tokio::test]
    async fn test_repeated_members_collapse_to_one_roster_entry() {
        let store = Arc::new(MemoryVoteStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(SessionLedger::new());

        let input = input("reg-1", &["a@x.com", "a@x.com", "b@x.com"]);
        assert_eq!(input.roster.len(), 2);

        use_case(store.clone(), notifier.clone(), ledger)
            .execute(input)
            .await
            .unwrap();

        let shell = store.load_session("reg-1").await.unwrap().unwrap();
        assert_eq!(shell.roster.len(), 2);
        assert_eq!(notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_roster_rejected() {
        let store = Arc::new(MemoryVoteStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(SessionLedger::new());

        let result = use_case(store, notifier, ledger)
            .execute(input("reg-1", &[]))
            .await;

        assert!(matches!(result, Err(CreateSessionError::EmptyRoster)));
    }

    #[tokio::test]
    async fn test_duplicate_invite_id_rejected() {
        let store = Arc::new(MemoryVoteStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let ledger = Arc::new(SessionLedger::new());
        let use_case = use_case(store, notifier, ledger);

        use_case.execute(input("reg-1", &["a@x.com"])).await.unwrap();
        let result = use_case.execute(input("reg-1", &["a@x.com"])).await;

        assert!(matches!(result, Err(CreateSessionError::DuplicateSession(id)) if id == "reg-1"));
    }

    #[tokio::test]
    async fn test_duplicate_detected_in_store_without_ledger_entry() {
        // Same durable store, fresh ledger: simulates a second process (or
        // a restart) trying to reuse the id.
        let store = Arc::new(MemoryVoteStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        use_case(store.clone(), notifier.clone(), Arc::new(SessionLedger::new()))
            .execute(input("reg-1", &["a@x.com"]))
            .await
            .unwrap();

        let result = use_case(store, notifier, Arc::new(SessionLedger::new()))
            .execute(input("reg-1", &["a@x.com"]))
            .await;

        assert!(matches!(result, Err(CreateSessionError::DuplicateSession(_))));
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_abort_creation() {
        let store = Arc::new(MemoryVoteStore::new());
        let notifier = Arc::new(RecordingNotifier::failing_for("b@x.com"));
        let ledger = Arc::new(SessionLedger::new());

        use_case(store.clone(), notifier.clone(), ledger)
            .execute(input("reg-1", &["a@x.com", "b@x.com"]))
            .await
            .unwrap();

        assert!(store.load_session("reg-1").await.unwrap().is_some());
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@x.com");
    }
}
