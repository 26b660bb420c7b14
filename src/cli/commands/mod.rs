//! Command handlers

use anyhow::{Context, Result};

use crate::application::{Pipeline, PipelineBuilder};
use crate::cli::output::progress::create_progress_bar;
use crate::domain::models::Config;

pub mod ask;
pub mod chat;
pub mod config;
pub mod history;
pub mod inspect;

/// Build the pipeline with an indexing progress bar on stderr
async fn build_pipeline(config: &Config, json_mode: bool) -> Result<Pipeline> {
    let pb = create_progress_bar(0, json_mode);
    pb.set_message("embedding chunks");

    let result = PipelineBuilder::new(config.clone())
        .build_with_progress(|done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })
        .await;

    pb.finish_and_clear();
    result.context("Failed to initialize pipeline")
}
