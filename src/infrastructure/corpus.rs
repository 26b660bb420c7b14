//! CSV corpus loader
//!
//! Reads the email corpus from a CSV file with a header row. One document is
//! produced per data row whose text cell is present and not blank.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::errors::{RagError, RagResult};
use crate::domain::models::{CorpusConfig, Document};

/// Loads documents from one column of a CSV file
#[derive(Debug, Clone)]
pub struct CsvCorpusLoader {
    path: PathBuf,
    text_column: String,
}

impl CsvCorpusLoader {
    pub fn new(path: impl Into<PathBuf>, text_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text_column: text_column.into(),
        }
    }

    pub fn from_config(config: &CorpusConfig) -> Self {
        Self::new(&config.path, &config.text_column)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and filter the corpus
    ///
    /// Errors: missing column is `Configuration`; unreadable or malformed
    /// file, or no usable rows, is `CorpusLoad`.
    pub async fn load(&self) -> RagResult<Vec<Document>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            RagError::CorpusLoad(format!("cannot read {}: {e}", self.path.display()))
        })?;

        let documents = self.parse(&bytes)?;

        info!(
            path = %self.path.display(),
            documents = documents.len(),
            "corpus loaded"
        );
        Ok(documents)
    }

    fn parse(&self, bytes: &[u8]) -> RagResult<Vec<Document>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| self.load_error(&e))?
            .clone();
        let column = headers
            .iter()
            .position(|h| h.trim() == self.text_column)
            .ok_or_else(|| {
                RagError::Configuration(format!(
                    "{} has no '{}' column (found: {})",
                    self.path.display(),
                    self.text_column,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })?;

        let mut documents = Vec::new();
        let mut dropped = 0_usize;

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| self.load_error(&e))?;
            match record.get(column) {
                Some(text) if !text.trim().is_empty() => {
                    documents.push(Document::from_row(idx + 1, text));
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!(dropped, "dropped rows with missing or blank text");
        }

        if documents.is_empty() {
            return Err(RagError::CorpusLoad(format!(
                "{} contains no non-empty '{}' values",
                self.path.display(),
                self.text_column
            )));
        }

        Ok(documents)
    }

    fn load_error(&self, err: &csv::Error) -> RagError {
        RagError::CorpusLoad(format!("malformed CSV in {}: {err}", self.path.display()))
    }
}
