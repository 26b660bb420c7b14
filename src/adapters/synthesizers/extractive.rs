//! Offline extractive synthesizer
//!
//! Answers by quoting the retrieved sentences that share the most terms with
//! the question. Needs no model, never hallucinates, and knows exactly which
//! chunks it drew from.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::ports::{AnswerSynthesizer, ProviderError, Synthesis, SynthesisRequest};

/// Answer returned when no retrieved sentence shares a term with the query
pub const NO_ANSWER: &str = "I don't know. None of the retrieved emails address that question.";

const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "but", "by", "can", "do", "does", "for",
    "from", "has", "have", "how", "i", "if", "in", "is", "it", "me", "my", "of", "on", "or",
    "our", "so", "that", "the", "their", "there", "this", "to", "was", "we", "what", "when",
    "where", "which", "who", "why", "will", "with", "you", "your",
];

/// Sentence-extraction synthesizer
#[derive(Debug, Clone)]
pub struct ExtractiveSynthesizer {
    max_sentences: usize,
}

impl Default for ExtractiveSynthesizer {
    fn default() -> Self {
        Self { max_sentences: 3 }
    }
}

impl ExtractiveSynthesizer {
    /// Quote at most `max_sentences` sentences per answer
    pub fn new(max_sentences: usize) -> Self {
        Self {
            max_sentences: max_sentences.max(1),
        }
    }

    fn synthesize(&self, request: &SynthesisRequest<'_>) -> Synthesis {
        let query_terms = terms(request.query);
        if query_terms.is_empty() {
            return Synthesis::attributed(NO_ANSWER, Vec::new());
        }

        // (matched terms, chunk index, sentence index, sentence)
        let mut candidates: Vec<(usize, usize, usize, &str)> = Vec::new();
        for (chunk_idx, chunk) in request.chunks.iter().enumerate() {
            for (sentence_idx, sentence) in sentences(&chunk.content).enumerate() {
                let overlap = terms(sentence).intersection(&query_terms).count();
                if overlap > 0 {
                    candidates.push((overlap, chunk_idx, sentence_idx, sentence));
                }
            }
        }

        if candidates.is_empty() {
            return Synthesis::attributed(NO_ANSWER, Vec::new());
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut seen = HashSet::new();
        let picked: Vec<_> = candidates
            .into_iter()
            .filter(|c| seen.insert(c.3))
            .take(self.max_sentences)
            .collect();

        let text = picked.iter().map(|c| c.3).collect::<Vec<_>>().join(" ");
        let mut sources: Vec<usize> = picked.iter().map(|c| c.1).collect();
        sources.sort_unstable();
        sources.dedup();

        Synthesis::attributed(text, sources)
    }
}

#[async_trait]
impl AnswerSynthesizer for ExtractiveSynthesizer {
    fn name(&self) -> &'static str {
        "extractive"
    }

    async fn generate(&self, request: SynthesisRequest<'_>) -> Result<Synthesis, ProviderError> {
        Ok(self.synthesize(&request))
    }
}

/// Lowercased content words
fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

/// Trimmed, non-empty sentences, terminators kept
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| s.chars().any(char::is_alphanumeric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Chunk;

    fn chunk(parent: &str, text: &str) -> Chunk {
        Chunk::new(parent, text, 0, 0, text.chars().count())
    }

    async fn answer(query: &str, chunks: &[Chunk]) -> Synthesis {
        ExtractiveSynthesizer::default()
            .generate(SynthesisRequest {
                query,
                context: "",
                chunks,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_quotes_matching_sentence_and_attributes_chunk() {
        let chunks = vec![
            chunk("row-1", "The offsite is on Friday. Bring a laptop."),
            chunk("row-2", "Hello team. Our refund policy allows returns within 30 days."),
        ];
        let synthesis = answer("What is the refund policy?", &chunks).await;

        assert_eq!(synthesis.text, "Our refund policy allows returns within 30 days.");
        assert_eq!(synthesis.attribution, Some(vec![1]));
    }

    #[tokio::test]
    async fn test_best_matches_first_and_bounded() {
        let chunks = vec![
            chunk("row-1", "Refund approved. Refund policy updated. Policy page moved. Lunch at noon."),
        ];
        let synthesizer = ExtractiveSynthesizer::new(2);
        let synthesis = synthesizer
            .generate(SynthesisRequest {
                query: "refund policy",
                context: "",
                chunks: &chunks,
            })
            .await
            .unwrap();

        assert_eq!(synthesis.text, "Refund policy updated. Refund approved.");
    }

    #[tokio::test]
    async fn test_no_overlap_says_unknown() {
        let chunks = vec![chunk("row-1", "The offsite is on Friday.")];
        let synthesis = answer("refund window?", &chunks).await;

        assert_eq!(synthesis.text, NO_ANSWER);
        assert_eq!(synthesis.attribution, Some(vec![]));
    }

    #[tokio::test]
    async fn test_stop_word_only_query() {
        let synthesis = answer("what is the", &[chunk("row-1", "What is the plan.")]).await;
        assert_eq!(synthesis.text, NO_ANSWER);
    }

    #[test]
    fn test_sentences_split_on_terminators_and_newlines() {
        let parts: Vec<&str> = sentences("Hi there! How are you?\nFine. ...").collect();
        assert_eq!(parts, vec!["Hi there!", "How are you?", "Fine."]);
    }
}
