//! Table output formatting for CLI commands using comfy-table.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use super::truncate;
use crate::domain::models::{ConversationRecord, ScoredChunk};

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

/// Conversation history, one row per turn
pub fn format_history_table(records: &[ConversationRecord]) -> String {
    let mut table = base_table(&["Timestamp", "Query", "Response"]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.formatted_timestamp()),
            Cell::new(truncate(&record.query, 60)),
            Cell::new(truncate(&record.response, 80)),
        ]);
    }
    table.to_string()
}

/// Retrieved chunks with their scores
pub fn format_sources_table(hits: &[ScoredChunk]) -> String {
    let mut table = base_table(&["Chunk", "Score", "Preview"]);
    for hit in hits {
        table.add_row(vec![
            Cell::new(&hit.chunk.id),
            Cell::new(format!("{:.3}", hit.score)),
            Cell::new(truncate(&hit.chunk.content.replace('\n', " "), 80)),
        ]);
    }
    table.to_string()
}
