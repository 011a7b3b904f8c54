//! JSON-file vote store
//!
//! One JSON document per session under a data directory, holding the
//! session shell, the current response rows, and the registration status.
//! Writes go through a temp file and rename so a crash mid-write never
//! leaves a truncated document behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use teamvote_application::ports::vote_store::{
    RegistrationStatus, SessionShell, StoreError, VoteStore,
};
use teamvote_domain::{ResponseRecord, SessionState};

/// The on-disk shape of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionDocument {
    shell: SessionShell,
    responses: BTreeMap<String, ResponseRecord>,
    registration: Option<RegistrationStatus>,
}

/// File-backed [`VoteStore`] writing one JSON document per session
///
/// Document read-modify-write cycles are serialized by a store-wide async
/// mutex; the per-session locking that orders concurrent submissions lives
/// a layer up, in the session ledger.
pub struct JsonVoteStore {
    data_dir: PathBuf,
    io_lock: Mutex<()>,
}

impl JsonVoteStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self {
            data_dir,
            io_lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn session_path(&self, invite_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize(invite_id)))
    }

    async fn read_document(&self, invite_id: &str) -> Result<Option<SessionDocument>, StoreError> {
        let path = self.session_path(invite_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        let document = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))?;
        Ok(Some(document))
    }

    async fn write_document(
        &self,
        invite_id: &str,
        document: &SessionDocument,
    ) -> Result<(), StoreError> {
        let path = self.session_path(invite_id);
        let tmp = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a document that must exist
    async fn require_document(&self, invite_id: &str) -> Result<SessionDocument, StoreError> {
        self.read_document(invite_id).await?.ok_or_else(|| {
            StoreError::Corrupt(format!("no document for session {}", invite_id))
        })
    }
}

#[async_trait]
impl VoteStore for JsonVoteStore {
    async fn create_session(&self, shell: &SessionShell) -> Result<(), StoreError> {
        let _guard = self.io_lock.lock().await;

        if self.read_document(&shell.invite_id).await?.is_some() {
            return Err(StoreError::DuplicateSession(shell.invite_id.clone()));
        }

        let document = SessionDocument {
            shell: shell.clone(),
            responses: BTreeMap::new(),
            registration: None,
        };
        self.write_document(&shell.invite_id, &document).await?;
        debug!(
            "Persisted session shell {} at {}",
            shell.invite_id,
            self.session_path(&shell.invite_id).display()
        );
        Ok(())
    }

    async fn load_session(&self, invite_id: &str) -> Result<Option<SessionShell>, StoreError> {
        let _guard = self.io_lock.lock().await;
        Ok(self.read_document(invite_id).await?.map(|d| d.shell))
    }

    async fn update_state(&self, invite_id: &str, state: SessionState) -> Result<(), StoreError> {
        let _guard = self.io_lock.lock().await;
        let mut document = self.require_document(invite_id).await?;
        document.shell.state = state;
        self.write_document(invite_id, &document).await
    }

    async fn upsert_response(&self, record: &ResponseRecord) -> Result<(), StoreError> {
        let _guard = self.io_lock.lock().await;
        let mut document = self.require_document(&record.invite_id).await?;
        document
            .responses
            .insert(record.member.clone(), record.clone());
        self.write_document(&record.invite_id, &document).await
    }

    async fn list_responses(&self, invite_id: &str) -> Result<Vec<ResponseRecord>, StoreError> {
        let _guard = self.io_lock.lock().await;
        Ok(self
            .read_document(invite_id)
            .await?
            .map(|d| d.responses.into_values().collect())
            .unwrap_or_default())
    }

    async fn set_registration_status(
        &self,
        invite_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), StoreError> {
        let _guard = self.io_lock.lock().await;
        let mut document = self.require_document(invite_id).await?;
        document.registration = Some(status);
        self.write_document(invite_id, &document).await
    }
}

/// Turn an invite id into a safe, collision-free file stem
///
/// Alphanumerics, `-` and `.` pass through; every other byte (including
/// `_`, which doubles as the escape marker) becomes `_XX`.
fn sanitize(invite_id: &str) -> String {
    let mut out = String::with_capacity(invite_id.len());
    for byte in invite_id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' => out.push(byte as char),
            _ => out.push_str(&format!("_{:02X}", byte)),
        }
    }
    out
}
