//! Conversation store port.
//!
//! A conversation store durably appends question/answer records. The logger
//! writes every turn to each configured store independently.

use async_trait::async_trait;

use crate::domain::errors::{RagResult, StoreKind};
use crate::domain::models::ConversationRecord;

/// Append-only persistence for conversation records.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Which physical representation this store maintains
    fn kind(&self) -> StoreKind;

    /// Append one record. Existing records are never modified.
    ///
    /// Failures are reported as `RagError::Persistence` naming this store.
    async fn append(&self, record: &ConversationRecord) -> RagResult<()>;
}
