//! Fresh review sentences for previously learned words
//!
//! One batched call covers the whole word list; any word the response
//! misses gets a fixed fallback line instead of a second call. A failed
//! call degrades to all-fallback, never to an error.

use std::collections::HashMap;

use tracing::warn;

use crate::generator::{GeneratorResult, ReviewSource};
use crate::text::strip_markdown;

/// Fallback line shown when no fresh sentence came back for a word
pub fn fallback_sentence(word: &str) -> String {
    format!("Review the usage of: {word}")
}

/// Fetch one new example sentence per word.
///
/// The returned map always has exactly one entry per distinct input word.
pub async fn review_sentences(
    source: &dyn ReviewSource,
    words: &[String],
) -> HashMap<String, String> {
    if words.is_empty() {
        return HashMap::new();
    }

    let generated = match source.review_sentence_batch(words).await {
        GeneratorResult::Ok(map) => map,
        GeneratorResult::Malformed { error, .. } => {
            warn!("Review sentence batch did not decode: {error}");
            HashMap::new()
        }
        GeneratorResult::ServiceError { status, detail } => {
            warn!("Review sentence batch failed (status {status:?}): {detail}");
            HashMap::new()
        }
    };

    words
        .iter()
        .map(|word| {
            let sentence = generated
                .get(word)
                .map(|s| strip_markdown(s))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback_sentence(word));
            (word.clone(), sentence)
        })
        .collect()
}
