//! Conversation logging service
//!
//! Fans every answered turn out to all configured conversation stores. A
//! failing store never blocks the others, and never affects the answer the
//! user already has; failures come back in a [`PersistenceReport`].

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::{RagError, StoreKind};
use crate::domain::models::ConversationRecord;
use crate::domain::ports::ConversationStore;

/// Outcome of persisting one turn
#[derive(Debug)]
pub struct PersistenceReport {
    record: ConversationRecord,
    failures: Vec<RagError>,
}

impl PersistenceReport {
    /// The record that was written
    pub fn record(&self) -> &ConversationRecord {
        &self.record
    }

    /// True if every store accepted the record
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Per-store persistence errors
    pub fn failures(&self) -> &[RagError] {
        &self.failures
    }

    /// Stores that failed to persist the record
    pub fn failed_stores(&self) -> Vec<StoreKind> {
        self.failures
            .iter()
            .filter_map(|e| match e {
                RagError::Persistence { store, .. } => Some(*store),
                _ => None,
            })
            .collect()
    }
}

/// Appends turns to every store, one writer at a time
pub struct ConversationLogger {
    stores: Vec<Arc<dyn ConversationStore>>,
    write_lock: Mutex<()>,
}

impl ConversationLogger {
    /// Logger over the given stores
    pub fn new(stores: Vec<Arc<dyn ConversationStore>>) -> Self {
        Self {
            stores,
            write_lock: Mutex::new(()),
        }
    }

    /// Persist a turn stamped with the current local time
    pub async fn record(&self, query: &str, response: &str) -> PersistenceReport {
        self.record_entry(ConversationRecord::now(query, response)).await
    }

    /// Persist a prepared record
    pub async fn record_entry(&self, record: ConversationRecord) -> PersistenceReport {
        let _guard = self.write_lock.lock().await;
        let mut failures = Vec::new();

        for store in &self.stores {
            match store.append(&record).await {
                Ok(()) => debug!(store = %store.kind(), "conversation turn persisted"),
                Err(err) => {
                    warn!(store = %store.kind(), error = %err, "failed to persist conversation turn");
                    failures.push(err);
                }
            }
        }

        PersistenceReport { record, failures }
    }
}
