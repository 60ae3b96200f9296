//! JSON flat-file conversation history.
//!
//! Implements `HistoryRepository` from `parley-core` by writing the whole
//! session mapping as pretty-printed JSON. Saves go to a sibling temp file
//! which is then renamed over the target, so a crash mid-write never leaves
//! a truncated history behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parley_core::chat::repository::HistoryRepository;
use parley_types::chat::HistorySnapshot;
use parley_types::error::RepositoryError;

/// History stored in a single JSON file (default `chat_history.json`).
#[derive(Debug, Clone)]
pub struct JsonHistoryFile {
    path: PathBuf,
}

impl JsonHistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "history".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryRepository for JsonHistoryFile {
    async fn load(&self) -> Result<HistorySnapshot, RepositoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No existing history file found");
                return Ok(HistorySnapshot::default());
            }
            Err(e) => {
                return Err(RepositoryError::Io(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(HistorySnapshot::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            RepositoryError::Serialization(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    async fn save(&self, snapshot: &HistorySnapshot) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::Io(format!("failed to create {}: {e}", parent.display())))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| RepositoryError::Io(format!("failed to write {}: {e}", temp.display())))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| RepositoryError::Io(format!("failed to replace {}: {e}", self.path.display())))?;

        tracing::debug!(
            path = %self.path.display(),
            messages = snapshot.message_count(),
            "Saved history file"
        );
        Ok(())
    }
}
