//! Durable vote store port
//!
//! The store is the system of record for sessions and responses; it
//! survives process restarts and outlives the in-process ledger entry for
//! a session indefinitely. The in-memory response map must always be a
//! deterministic projection of the rows held here.

use std::collections::BTreeSet;
use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use teamvote_domain::{ResponseRecord, SessionState};

/// Errors that can occur during vote store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session {0} already exists")]
    DuplicateSession(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Corrupt session record: {0}")]
    Corrupt(String),
}

/// Final registration status written against the external
/// tournament-registration record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Declined,
}

/// The durable shape of a session minus its responses
///
/// Persisted before the dispatcher returns, so a crash after creation but
/// before any response still allows the roster to be recovered on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionShell {
    pub invite_id: String,
    pub team_id: String,
    pub tournament_id: String,
    pub roster: BTreeSet<String>,
    pub state: SessionState,
}

/// Port for the durable vote store
///
/// `(invite_id, member)` is the unique response key; `upsert_response`
/// overwrites any earlier row for the same key (idempotent upsert, not an
/// append-only log).
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Persist a new session shell; fails if the id already exists
    async fn create_session(&self, shell: &SessionShell) -> Result<(), StoreError>;

    /// Fetch a session shell by id, `None` if it was never created
    async fn load_session(&self, invite_id: &str) -> Result<Option<SessionShell>, StoreError>;

    /// Persist the session's current state (terminal transitions)
    async fn update_state(&self, invite_id: &str, state: SessionState) -> Result<(), StoreError>;

    /// Write or overwrite the row for `(record.invite_id, record.member)`
    async fn upsert_response(&self, record: &ResponseRecord) -> Result<(), StoreError>;

    /// All current rows for a session, one per responding member
    async fn list_responses(&self, invite_id: &str) -> Result<Vec<ResponseRecord>, StoreError>;

    /// Write the final outcome against the tournament-registration record
    async fn set_registration_status(
        &self,
        invite_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    sessions: HashMap<String, SessionShell>,
    responses: HashMap<String, HashMap<String, ResponseRecord>>,
    registrations: HashMap<String, RegistrationStatus>,
}

/// In-memory vote store
///
/// Backs the application tests and ad-hoc demos; a multi-process
/// deployment uses a persistent adapter from the infrastructure layer
/// instead.
#[derive(Debug, Default)]
pub struct MemoryVoteStore {
    state: Mutex<MemoryState>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registration status written for a session, if any
    pub async fn registration_status(&self, invite_id: &str) -> Option<RegistrationStatus> {
        self.state.lock().await.registrations.get(invite_id).copied()
    }
}

#[async_trait]
impl VoteStore for MemoryVoteStore {
    async fn create_session(&self, shell: &SessionShell) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.sessions.contains_key(&shell.invite_id) {
            return Err(StoreError::DuplicateSession(shell.invite_id.clone()));
        }
        state.sessions.insert(shell.invite_id.clone(), shell.clone());
        Ok(())
    }

    async fn load_session(&self, invite_id: &str) -> Result<Option<SessionShell>, StoreError> {
        Ok(self.state.lock().await.sessions.get(invite_id).cloned())
    }

    async fn update_state(&self, invite_id: &str, state: SessionState) -> Result<(), StoreError> {
        let mut guard = self.state.lock().await;
        if let Some(shell) = guard.sessions.get_mut(invite_id) {
            shell.state = state;
        }
        Ok(())
    }

    async fn upsert_response(&self, record: &ResponseRecord) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .responses
            .entry(record.invite_id.clone())
            .or_default()
            .insert(record.member.clone(), record.clone());
        Ok(())
    }

    async fn list_responses(&self, invite_id: &str) -> Result<Vec<ResponseRecord>, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .responses
            .get(invite_id)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn set_registration_status(
        &self,
        invite_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .registrations
            .insert(invite_id.to_string(), status);
        Ok(())
    }
}
