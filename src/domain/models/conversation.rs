//! Conversation log domain models

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Timestamp format shared by every conversation store
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted question/answer turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Local wall-clock time of the turn, second precision
    pub timestamp: NaiveDateTime,

    /// Query text as submitted (trimmed)
    pub query: String,

    /// Synthesized answer
    pub response: String,
}

impl ConversationRecord {
    /// Create a record stamped with the current local time
    pub fn now(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self::at(Local::now().naive_local(), query, response)
    }

    /// Create a record with an explicit timestamp (truncated to seconds)
    pub fn at(
        timestamp: NaiveDateTime,
        query: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self {
            timestamp,
            query: query.into(),
            response: response.into(),
        }
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
