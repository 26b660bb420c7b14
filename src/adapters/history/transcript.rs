//! Plain-text conversation transcript.
//!
//! Each turn is appended as
//!
//! ```text
//! Q: <query>
//! A: <response>
//!
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::ensure_parent_dir;
use crate::domain::errors::{RagError, RagResult, StoreKind};
use crate::domain::models::ConversationRecord;
use crate::domain::ports::ConversationStore;

/// Append-only `Q:`/`A:` transcript file
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(record: &ConversationRecord) -> String {
        format!("Q: {}\nA: {}\n\n", record.query, record.response)
    }

    fn error(&self, err: &std::io::Error) -> RagError {
        RagError::persistence(
            StoreKind::Transcript,
            format!("{}: {err}", self.path.display()),
        )
    }
}

#[async_trait]
impl ConversationStore for TranscriptStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Transcript
    }

    async fn append(&self, record: &ConversationRecord) -> RagResult<()> {
        ensure_parent_dir(&self.path)
            .await
            .map_err(|e| self.error(&e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.error(&e))?;

        file.write_all(Self::format(record).as_bytes())
            .await
            .map_err(|e| self.error(&e))?;
        file.flush().await.map_err(|e| self.error(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let store = TranscriptStore::new(dir.path().join("chat_history.txt"));

        store
            .append(&ConversationRecord::now("What is the refund policy?", "30 days."))
            .await
            .unwrap();
        store
            .append(&ConversationRecord::now("Who approved it?", "Dana."))
            .await
            .unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "Q: What is the refund policy?\nA: 30 days.\n\nQ: Who approved it?\nA: Dana.\n\n"
        );
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = TranscriptStore::new(dir.path().join("logs/nested/chat.txt"));

        store.append(&ConversationRecord::now("q", "a")).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_unwritable_path_reports_transcript_store() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending.
        let store = TranscriptStore::new(dir.path());

        let err = store
            .append(&ConversationRecord::now("q", "a"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RagError::Persistence {
                store: StoreKind::Transcript,
                ..
            }
        ));
    }
}
