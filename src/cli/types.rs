//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mailrag")]
#[command(about = "Ask questions about an email corpus", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Load configuration from this file instead of .mailrag/
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive question-answering session
    Chat {
        /// List the source chunks under each answer
        #[arg(short, long)]
        sources: bool,
    },

    /// Answer a single question and exit
    Ask {
        /// The question to answer
        query: String,

        /// Show the retrieved source chunks
        #[arg(short, long)]
        sources: bool,
    },

    /// Show the conversation history
    History {
        /// Show only the most recent N turns
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Load and chunk the corpus without building the index
    Inspect,

    /// Print the effective configuration
    Config,
}
