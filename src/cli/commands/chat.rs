use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{stderr, stdin, stdout, AsyncWrite, BufReader};

use super::build_pipeline;
use crate::application::ChatSession;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Debug, Serialize)]
pub struct ChatOutput {
    pub answered: usize,
    pub failed: usize,
    pub persistence_failures: usize,
}

impl CommandOutput for ChatOutput {
    fn to_human(&self) -> String {
        format!(
            "Goodbye. Answered {} question{}.",
            self.answered,
            if self.answered == 1 { "" } else { "s" }
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Where the interactive prompts and answers are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStream {
    Stdout,
    /// JSON mode: stdout carries only the final summary
    Stderr,
}

impl ChatStream {
    pub const fn for_mode(json_mode: bool) -> Self {
        if json_mode {
            Self::Stderr
        } else {
            Self::Stdout
        }
    }

    fn writer(self) -> Box<dyn AsyncWrite + Unpin + Send> {
        match self {
            Self::Stdout => Box::new(stdout()),
            Self::Stderr => Box::new(stderr()),
        }
    }
}

pub async fn execute(config: &Config, show_sources: bool, json_mode: bool) -> Result<()> {
    let mut pipeline = build_pipeline(config, json_mode).await?;
    let stats = pipeline.stats();

    let stream = ChatStream::for_mode(json_mode);
    let banner = format!(
        "Indexed {} chunks from {} emails. Type 'exit' or 'quit' to leave.",
        stats.chunks, stats.documents
    );
    match stream {
        ChatStream::Stdout => println!("{banner}"),
        ChatStream::Stderr => eprintln!("{banner}"),
    }

    let summary = ChatSession::new(&mut pipeline, BufReader::new(stdin()), stream.writer())
        .show_sources(show_sources)
        .run()
        .await
        .context("Chat session I/O failed")?;

    output(
        &ChatOutput {
            answered: summary.answered,
            failed: summary.failed,
            persistence_failures: summary.persistence_failures,
        },
        json_mode,
    );
    Ok(())
}
