//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; defaults make every section optional.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Coordinator settings (link base URL, outcome-write retry)
    pub coordinator: FileCoordinatorConfig,
    /// Durable store settings
    pub storage: FileStorageConfig,
    /// Notifier settings
    pub notify: FileNotifyConfig,
}

/// `[coordinator]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCoordinatorConfig {
    /// Public base URL embedded in response links
    pub link_base_url: String,
    /// Attempts for the terminal outcome write
    pub retry_attempts: u32,
    /// Initial backoff between attempts, in milliseconds (doubles per retry)
    pub retry_backoff_ms: u64,
}

impl Default for FileCoordinatorConfig {
    fn default() -> Self {
        Self {
            link_base_url: "http://localhost:8080".to_string(),
            retry_attempts: 3,
            retry_backoff_ms: 100,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding one JSON document per session
    pub data_dir: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir: base.join("teamvote").join("sessions"),
        }
    }
}

/// `[notify]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotifyConfig {
    /// Outbox file the default notifier appends to
    pub outbox_path: PathBuf,
    /// Webhook endpoint; used instead of the outbox when set and the
    /// `webhook` feature is enabled
    pub webhook_url: Option<String>,
}

impl Default for FileNotifyConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            outbox_path: base.join("teamvote").join("outbox.jsonl"),
            webhook_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = FileConfig::default();
        assert_eq!(config.coordinator.retry_attempts, 3);
        assert!(config.notify.webhook_url.is_none());
        assert!(config.storage.data_dir.ends_with("sessions"));
    }

    #[test]
    fn test_partial_toml_merges_with_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [coordinator]
            link_base_url = "https://teamvote.example"
            "#,
        )
        .unwrap();

        assert_eq!(config.coordinator.link_base_url, "https://teamvote.example");
        assert_eq!(config.coordinator.retry_attempts, 3);
    }
}
