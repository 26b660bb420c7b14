//! Domain errors for the mailrag pipeline.

use std::fmt;

use thiserror::Error;

/// Which persistent conversation store a persistence error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Plain-text `Q:`/`A:` transcript.
    Transcript,
    /// Tabular `Timestamp,Query,Response` log.
    Table,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transcript => write!(f, "transcript"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Errors that can occur while building or serving the pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    #[error("Index build failed: {0}")]
    IndexBuild(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("Failed to persist conversation to {store} store: {message}")]
    Persistence { store: StoreKind, message: String },

    #[error("Query is empty")]
    EmptyQuery,
}

impl RagError {
    /// Startup errors: the process must not go on to serve queries.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::CorpusLoad(_) | Self::IndexBuild(_)
        )
    }

    pub(crate) fn persistence(store: StoreKind, message: impl Into<String>) -> Self {
        Self::Persistence {
            store,
            message: message.into(),
        }
    }
}

pub type RagResult<T> = Result<T, RagError>;
