use anyhow::{Context, Result};
use serde::Serialize;

use super::build_pipeline;
use crate::cli::output::table::format_sources_table;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ScoredChunk};

#[derive(Debug, Serialize)]
pub struct SourceOutput {
    pub chunk_id: String,
    pub score: f32,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AskOutput {
    pub query: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceOutput>>,
    pub persistence_failures: Vec<String>,
    #[serde(skip)]
    hits: Vec<ScoredChunk>,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.answer.clone()];
        if self.sources.is_some() && !self.hits.is_empty() {
            lines.push("\nSources:".to_string());
            lines.push(format_sources_table(&self.hits));
        }
        for failure in &self.persistence_failures {
            lines.push(format!("\nWarning: {failure}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(config: &Config, query: &str, show_sources: bool, json_mode: bool) -> Result<()> {
    let mut pipeline = build_pipeline(config, json_mode).await?;
    let turn = pipeline
        .answer(query)
        .await
        .context("Failed to answer question")?;

    // Keep retrieval order; only chunks the answer was attributed to.
    let hits: Vec<ScoredChunk> = turn
        .scores
        .into_iter()
        .filter(|hit| turn.answer.sources.iter().any(|s| s.id == hit.chunk.id))
        .collect();

    let sources = show_sources.then(|| {
        hits.iter()
            .map(|hit| SourceOutput {
                chunk_id: hit.chunk.id.clone(),
                score: hit.score,
                content: hit.chunk.content.clone(),
            })
            .collect()
    });

    let result = AskOutput {
        query: turn.answer.query,
        answer: turn.answer.text,
        sources,
        persistence_failures: turn
            .persistence
            .failures()
            .iter()
            .map(ToString::to_string)
            .collect(),
        hits,
    };

    output(&result, json_mode);
    Ok(())
}
