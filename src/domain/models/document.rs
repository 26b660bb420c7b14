//! Corpus document model

use serde::{Deserialize, Serialize};

/// A raw unit of corpus text, such as one email body.
///
/// Documents only live long enough to be chunked; the index keeps chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Provenance identifier, `row-<n>` for the n-th corpus data row
    pub id: String,

    /// Full text of the document
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Document built from the 1-based data row of a corpus file
    pub fn from_row(row: usize, text: impl Into<String>) -> Self {
        Self::new(format!("row-{row}"), text)
    }

    /// True when the text carries nothing worth chunking
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
