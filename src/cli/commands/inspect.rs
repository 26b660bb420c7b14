use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::progress::create_spinner;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::corpus::CsvCorpusLoader;
use crate::services::Chunker;

#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub corpus: PathBuf,
    pub documents: usize,
    pub chunks: usize,
    pub avg_chunk_chars: f64,
    pub max_chunk_chars: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl CommandOutput for InspectOutput {
    fn to_human(&self) -> String {
        [
            format!("Corpus:          {}", self.corpus.display()),
            format!("Documents:       {}", self.documents),
            format!("Chunks:          {}", self.chunks),
            format!("Avg chunk chars: {:.1}", self.avg_chunk_chars),
            format!("Max chunk chars: {}", self.max_chunk_chars),
            format!("Chunking:        size {}, overlap {}", self.chunk_size, self.chunk_overlap),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let chunker = Chunker::new(config.chunking.clone())?;
    let loader = CsvCorpusLoader::from_config(&config.corpus);

    let spinner = create_spinner("Loading corpus", json_mode);
    let documents = loader.load().await;
    spinner.finish_and_clear();
    let documents = documents.context("Failed to load corpus")?;

    let chunks = chunker.split_all(&documents);
    let total_chars: usize = chunks.iter().map(|c| c.char_len()).sum();

    let result = InspectOutput {
        corpus: loader.path().to_path_buf(),
        documents: documents.len(),
        chunks: chunks.len(),
        avg_chunk_chars: if chunks.is_empty() {
            0.0
        } else {
            total_chars as f64 / chunks.len() as f64
        },
        max_chunk_chars: chunks.iter().map(|c| c.char_len()).max().unwrap_or(0),
        chunk_size: config.chunking.chunk_size,
        chunk_overlap: config.chunking.chunk_overlap,
    };

    output(&result, json_mode);
    Ok(())
}
