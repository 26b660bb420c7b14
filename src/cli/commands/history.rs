use anyhow::{Context, Result};
use serde::Serialize;

use crate::adapters::history::TableStore;
use crate::cli::output::table::format_history_table;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ConversationRecord};

#[derive(Debug, Serialize)]
pub struct HistoryOutput {
    pub total: usize,
    pub records: Vec<ConversationRecord>,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        if self.records.is_empty() {
            return "No conversation history yet.".to_string();
        }
        format!(
            "{}\n\nShowing {} of {} turn{}",
            format_history_table(&self.records),
            self.records.len(),
            self.total,
            if self.total == 1 { "" } else { "s" }
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(config: &Config, limit: Option<usize>, json_mode: bool) -> Result<()> {
    let store = TableStore::new(&config.history.table_path);
    let mut records = store
        .load()
        .await
        .context("Failed to read conversation history")?;

    let total = records.len();
    if let Some(limit) = limit {
        records = records.split_off(total.saturating_sub(limit));
    }

    output(&HistoryOutput { total, records }, json_mode);
    Ok(())
}
