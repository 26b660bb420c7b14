//! Interactive chat session over any line-oriented input/output

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

use super::pipeline::Pipeline;

/// Prompt written before each line of input
pub const USER_PROMPT: &str = "You: ";

/// Prefix written before each answer
pub const BOT_PREFIX: &str = "Bot: ";

/// Counts for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Queries answered successfully
    pub answered: usize,
    /// Queries that failed with a per-query error
    pub failed: usize,
    /// Store writes that failed after an answer was delivered
    pub persistence_failures: usize,
}

/// Read-answer loop
///
/// `exit` or `quit` (any case) ends the session, as does end of input.
/// Blank lines are ignored. A failing query prints an error and the loop
/// continues.
pub struct ChatSession<'a, R, W> {
    pipeline: &'a mut Pipeline,
    input: R,
    output: W,
    show_sources: bool,
}

impl<'a, R, W> ChatSession<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(pipeline: &'a mut Pipeline, input: R, output: W) -> Self {
        Self {
            pipeline,
            input,
            output,
            show_sources: false,
        }
    }

    /// Print the source chunk ids under each answer
    #[must_use]
    pub fn show_sources(mut self, show: bool) -> Self {
        self.show_sources = show;
        self
    }

    /// Run until exit or end of input
    pub async fn run(mut self) -> std::io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut line = String::new();

        loop {
            self.output.write_all(USER_PROMPT.as_bytes()).await?;
            self.output.flush().await?;

            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                self.output.write_all(b"\n").await?;
                break;
            }

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if is_exit_command(input) {
                break;
            }

            match self.pipeline.answer(input).await {
                Ok(turn) => {
                    summary.answered += 1;
                    let mut out = format!("{BOT_PREFIX}{}\n", turn.answer.text);
                    if self.show_sources {
                        for source in &turn.answer.sources {
                            out.push_str(&format!("  - {}\n", source.id));
                        }
                    }
                    for failure in turn.persistence.failures() {
                        summary.persistence_failures += 1;
                        out.push_str(&format!("Warning: {failure}\n"));
                    }
                    self.output.write_all(out.as_bytes()).await?;
                }
                Err(err) => {
                    summary.failed += 1;
                    self.output
                        .write_all(format!("Error: {err}\n").as_bytes())
                        .await?;
                }
            }
        }

        self.output.flush().await?;
        info!(
            answered = summary.answered,
            failed = summary.failed,
            persistence_failures = summary.persistence_failures,
            "chat session ended"
        );
        Ok(summary)
    }
}

/// `exit` / `quit`, case-insensitive, already trimmed
pub fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
