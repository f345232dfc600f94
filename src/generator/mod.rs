//! Generator boundary: "submit prompt, receive structured text"
//!
//! The rest of the crate talks to the external text-generation service
//! through the traits here. Responses are decoded strictly into
//! [`GeneratorResult`] and pattern-matched by callers; there is no
//! error-string sniffing and no control flow by exception.

mod client;
mod prompts;

pub use client::{GeminiClient, GeneratorError, DEFAULT_MODEL};

use std::collections::HashMap;

use async_trait::async_trait;

use crate::types::VocabularyWord;

/// Strict decode errors for generator payloads
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected}, got a different JSON shape")]
    UnexpectedShape { expected: &'static str },
    #[error("response envelope had no text part")]
    MissingText,
}

/// Outcome of one generator call, decoded against the expected schema.
///
/// Callers treat `Malformed` and `ServiceError` as "no usable candidates
/// this call" — neither is allowed to terminate the process.
#[derive(Debug)]
pub enum GeneratorResult<T> {
    Ok(T),
    Malformed { raw: String, error: ParseError },
    ServiceError { status: Option<u16>, detail: String },
}

impl<T> GeneratorResult<T> {
    /// The payload, or `None` for either failure variant
    pub fn into_option(self) -> Option<T> {
        match self {
            GeneratorResult::Ok(value) => Some(value),
            _ => None,
        }
    }
}

/// One request for a batch of candidate vocabulary items
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// How many candidates to ask for (over-fetched by the selector)
    pub count: usize,
    pub topics: Vec<String>,
    /// Sample of already-used words embedded as a do-not-reuse hint;
    /// empty after the first selection round
    pub avoid_words: Vec<String>,
}

/// Source of candidate word/definition/sentence triples
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn vocabulary_batch(&self, request: &BatchRequest) -> GeneratorResult<Vec<VocabularyWord>>;
}

/// Source of fresh review sentences, one per word, in a single batched call
#[async_trait]
pub trait ReviewSource: Send + Sync {
    async fn review_sentence_batch(&self, words: &[String]) -> GeneratorResult<HashMap<String, String>>;
}
