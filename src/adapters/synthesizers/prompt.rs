//! Prompt template for generative synthesizers.
//!
//! All retrieved chunks are "stuffed" into one prompt ahead of the question.

use crate::domain::ports::SynthesisRequest;

/// Instructions placed before the retrieved context
pub const INSTRUCTIONS: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Render the full prompt for `request`
pub fn render(request: &SynthesisRequest<'_>) -> String {
    format!(
        "{INSTRUCTIONS}\n\n{}\n\nQuestion: {}\nHelpful Answer:",
        request.context, request.query
    )
}
