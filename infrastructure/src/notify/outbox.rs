//! JSONL outbox notifier
//!
//! Appends each message as a single JSON line to an outbox file that an
//! external delivery process (or a human, during development) drains.
//! Matches the coordinator's delivery contract exactly: best-effort,
//! no receipt.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::warn;

use teamvote_application::ports::notifier::{Notifier, NotifierError};

/// Notifier that writes one JSON object per line to an outbox file
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line so a
/// crash loses at most the message being written. Flushes on `Drop`.
pub struct OutboxNotifier {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl OutboxNotifier {
    /// Create a notifier appending to the given path
    ///
    /// Creates the file (and parent directories) if they don't exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, NotifierError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create outbox directory {}: {}", parent.display(), e);
            return Err(NotifierError::Unavailable(e.to_string()));
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| NotifierError::Unavailable(e.to_string()))?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the outbox file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifierError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = serde_json::json!({
            "timestamp": timestamp,
            "recipient": recipient,
            "subject": subject,
            "body": body,
        });

        let line = serde_json::to_string(&record).map_err(|e| NotifierError::DeliveryFailed {
            recipient: recipient.to_string(),
            reason: e.to_string(),
        })?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| NotifierError::Unavailable("outbox lock poisoned".to_string()))?;
        writeln!(writer, "{}", line)
            .and_then(|_| writer.flush())
            .map_err(|e| NotifierError::DeliveryFailed {
                recipient: recipient.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Drop for OutboxNotifier {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
