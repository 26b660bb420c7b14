//! Tabular conversation log.
//!
//! A CSV file with header `Timestamp,Query,Response`. Rows are appended one
//! per turn; earlier rows are never rewritten, so the cost of a turn does not
//! grow with the size of the history.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use super::ensure_parent_dir;
use crate::domain::errors::{RagError, RagResult, StoreKind};
use crate::domain::models::{ConversationRecord, TIMESTAMP_FORMAT};
use crate::domain::ports::ConversationStore;

/// Column names, in order
pub const HEADER: [&str; 3] = ["Timestamp", "Query", "Response"];

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Query")]
    query: String,
    #[serde(rename = "Response")]
    response: String,
}

/// Append-only CSV conversation table
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row back, oldest first; a missing file is an empty table
    pub async fn load(&self) -> RagResult<Vec<ConversationRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.error(e)),
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        reader
            .deserialize::<Row>()
            .map(|row| {
                let row = row.map_err(|e| self.error(e))?;
                let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, TIMESTAMP_FORMAT)
                    .map_err(|e| self.error(format!("bad timestamp '{}': {e}", row.timestamp)))?;
                Ok(ConversationRecord::at(timestamp, row.query, row.response))
            })
            .collect()
    }

    /// Encode one record, preceded by the header when `with_header` is set
    fn encode(record: &ConversationRecord, with_header: bool) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        if with_header {
            writer.write_record(HEADER)?;
        }
        writer.serialize(Row {
            timestamp: record.formatted_timestamp(),
            query: record.query.clone(),
            response: record.response.clone(),
        })?;
        writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }

    async fn ends_with_newline(&self) -> std::io::Result<bool> {
        let mut file = File::open(&self.path).await?;
        file.seek(SeekFrom::End(-1)).await?;
        let mut last = [0_u8; 1];
        file.read_exact(&mut last).await?;
        Ok(last[0] == b'\n')
    }

    fn error(&self, err: impl std::fmt::Display) -> RagError {
        RagError::persistence(StoreKind::Table, format!("{}: {err}", self.path.display()))
    }
}

#[async_trait]
impl ConversationStore for TableStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Table
    }

    async fn append(&self, record: &ConversationRecord) -> RagResult<()> {
        ensure_parent_dir(&self.path).await.map_err(|e| self.error(e))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.error(e))?;

        let len = file.metadata().await.map_err(|e| self.error(e))?.len();

        // A torn last row must not absorb the new one.
        let mut bytes = Vec::new();
        if len > 0 && !self.ends_with_newline().await.map_err(|e| self.error(e))? {
            bytes.push(b'\n');
        }
        bytes.extend(Self::encode(record, len == 0).map_err(|e| self.error(e))?);

        file.write_all(&bytes).await.map_err(|e| self.error(e))?;
        file.flush().await.map_err(|e| self.error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(hour: u32, query: &str, response: &str) -> ConversationRecord {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 5)
            .unwrap();
        ConversationRecord::at(ts, query, response)
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("chat_history.csv"));

        store.append(&record(9, "first", "one")).await.unwrap();
        store.append(&record(10, "second", "two")).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "Timestamp,Query,Response\n\
             2024-03-14 09:00:05,first,one\n\
             2024-03-14 10:00:05,second,two\n"
        );
    }

    #[tokio::test]
    async fn test_load_round_trips_awkward_text() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("chat_history.csv"));
        let tricky = record(11, "Refund, \"urgent\"?", "Line one\nLine two");

        store.append(&tricky).await.unwrap();
        store.append(&record(12, "plain", "answer")).await.unwrap();

        let rows = store.load().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], tricky);
        assert_eq!(rows[1].query, "plain");
    }

    #[tokio::test]
    async fn test_existing_empty_file_gets_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.csv");
        std::fs::write(&path, "").unwrap();

        let store = TableStore::new(&path);
        store.append(&record(8, "q", "a")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Timestamp,Query,Response\n"));
    }

    #[tokio::test]
    async fn test_row_without_trailing_newline_is_left_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.csv");
        std::fs::write(&path, "Timestamp,Query,Response\n2024-01-01 00:00:00,old,row").unwrap();

        let store = TableStore::new(&path);
        store.append(&record(8, "new", "row")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Timestamp,Query,Response\n\
             2024-01-01 00:00:00,old,row\n\
             2024-03-14 08:00:05,new,row\n"
        );

        let rows = store.load().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].query, "old");
        assert_eq!(rows[1].query, "new");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path().join("absent.csv"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_bad_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat_history.csv");
        std::fs::write(&path, "Timestamp,Query,Response\nyesterday,q,a\n").unwrap();

        let err = TableStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, RagError::Persistence { store: StoreKind::Table, .. }));
    }
}
