//! Anti-repeat word selection
//!
//! Wraps a [`CandidateSource`] in a bounded fetch-and-filter loop: over-ask,
//! drop anything seen in the exclusion window, top up, stop. Rejection is
//! whole-candidate: a stale example sentence disqualifies the word that
//! carries it.

use tracing::warn;

use crate::generator::{BatchRequest, CandidateSource, GeneratorResult};
use crate::normalize::normalize;
use crate::types::VocabularyWord;
use crate::usage::UsageStore;

/// Upper bound on fetch rounds per selection
pub const MAX_ROUNDS: usize = 3;
/// Extra candidates asked for in the first round
const FIRST_ROUND_OVERFETCH: usize = 5;
/// Extra candidates asked for in each top-up round
const TOP_UP_OVERFETCH: usize = 3;

/// Outcome of one selection: the accepted words, in acceptance order,
/// plus what was asked for so callers can surface a shortfall
#[derive(Debug)]
pub struct Selection {
    pub words: Vec<VocabularyWord>,
    pub requested: usize,
}

impl Selection {
    pub fn is_short(&self) -> bool {
        self.words.len() < self.requested
    }
}

/// Stateful selection over a candidate source and the usage store
pub struct Selector<'a> {
    source: &'a dyn CandidateSource,
    store: &'a mut UsageStore,
}

impl<'a> Selector<'a> {
    pub fn new(source: &'a dyn CandidateSource, store: &'a mut UsageStore) -> Self {
        Self { source, store }
    }

    /// Select up to `count` fresh words for `topics`.
    ///
    /// "Fresh" means the normalized word and the normalized sentence are both
    /// absent from the trailing `exclude_days` window and from everything
    /// accepted earlier in this call. Accepted items are written to the store
    /// immediately, so a crash mid-selection never hands out a repeat later.
    ///
    /// A shortfall is not an error: after [`MAX_ROUNDS`] rounds, or two
    /// consecutive calls that failed or came back empty, the partial result
    /// is returned and the caller decides what to tell the user. A batch of
    /// nothing-but-duplicates still buys the next round.
    pub async fn select_words(
        &mut self,
        count: usize,
        topics: &[String],
        exclude_days: u32,
    ) -> Selection {
        let mut seen_words = self.store.used_words_in_range(exclude_days);
        let mut seen_sentences = self.store.used_sentences_in_range(exclude_days);

        let mut selected: Vec<VocabularyWord> = Vec::with_capacity(count);
        let mut empty_rounds = 0;

        for round in 0..MAX_ROUNDS {
            if selected.len() >= count {
                break;
            }

            let ask = if round == 0 {
                count + FIRST_ROUND_OVERFETCH
            } else {
                count - selected.len() + TOP_UP_OVERFETCH
            };
            // The do-not-reuse hint goes out with the first call only;
            // top-up rounds rely on local filtering
            let avoid_words = if round == 0 {
                let mut avoid: Vec<String> = seen_words.iter().cloned().collect();
                avoid.sort();
                avoid
            } else {
                Vec::new()
            };
            let request = BatchRequest {
                count: ask,
                topics: topics.to_vec(),
                avoid_words,
            };

            let candidates = match self.source.vocabulary_batch(&request).await {
                GeneratorResult::Ok(candidates) => candidates,
                GeneratorResult::Malformed { error, .. } => {
                    warn!("Candidate batch did not decode in round {round}: {error}");
                    Vec::new()
                }
                GeneratorResult::ServiceError { status, detail } => {
                    warn!(
                        "Candidate batch failed in round {round} (status {status:?}): {detail}"
                    );
                    Vec::new()
                }
            };

            // Only a failed or empty call counts toward the cutoff; a round
            // whose candidates are all duplicates is not "empty"
            if candidates.is_empty() {
                empty_rounds += 1;
                if empty_rounds >= 2 {
                    break;
                }
                continue;
            }
            empty_rounds = 0;

            for candidate in candidates {
                if selected.len() >= count {
                    break;
                }
                let word_key = normalize(&candidate.word);
                if word_key.is_empty() || seen_words.contains(&word_key) {
                    continue;
                }
                let sentence_key = normalize(&candidate.sentence);
                if !sentence_key.is_empty() && seen_sentences.contains(&sentence_key) {
                    continue;
                }

                seen_words.insert(word_key);
                if !sentence_key.is_empty() {
                    seen_sentences.insert(sentence_key);
                }
                self.store.record_word(&candidate.word);
                self.store.record_sentence(&candidate.sentence);
                selected.push(candidate);
            }
        }

        if selected.len() < count {
            warn!("Selected {} of {count} requested words", selected.len());
        }
        Selection {
            words: selected,
            requested: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Local;

    use crate::generator::ParseError;
    use crate::types::WordLearningRecord;

    /// Scripted candidate source: pops one queued response per call and
    /// records every request it sees
    struct ScriptedSource {
        responses: Mutex<VecDeque<GeneratorResult<Vec<VocabularyWord>>>>,
        requests: Mutex<Vec<BatchRequest>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<GeneratorResult<Vec<VocabularyWord>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<BatchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CandidateSource for ScriptedSource {
        async fn vocabulary_batch(
            &self,
            request: &BatchRequest,
        ) -> GeneratorResult<Vec<VocabularyWord>> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(GeneratorResult::Ok(Vec::new()))
        }
    }

    fn candidate(word: &str, sentence: &str) -> VocabularyWord {
        VocabularyWord::candidate(word, "def.", sentence)
    }

    fn candidates(pairs: &[(&str, &str)]) -> Vec<VocabularyWord> {
        pairs.iter().map(|(w, s)| candidate(w, s)).collect()
    }

    fn empty_store() -> UsageStore {
        let dir = tempfile::tempdir().unwrap();
        UsageStore::open(dir.path().join("usage_record.json"))
    }

    #[tokio::test]
    async fn test_first_round_overfetches_and_truncates() {
        let source = ScriptedSource::new(vec![GeneratorResult::Ok(candidates(&[
            ("alpha", "Alpha one."),
            ("beta", "Beta one."),
            ("gamma", "Gamma one."),
        ]))]);
        let mut store = empty_store();

        let selection = Selector::new(&source, &mut store)
            .select_words(2, &["science".into()], 7)
            .await;

        assert_eq!(selection.words.len(), 2);
        assert!(!selection.is_short());
        assert_eq!(selection.words[0].word, "alpha");
        assert_eq!(selection.words[1].word, "beta");

        let requests = source.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].count, 7, "first round asks for count + 5");
    }

    #[tokio::test]
    async fn test_recently_used_words_are_rejected() {
        let source = ScriptedSource::new(vec![GeneratorResult::Ok(candidates(&[
            ("Erosion", "Coastal erosion accelerates."),
            ("fresh", "A fresh sentence."),
        ]))]);
        let mut store = empty_store();
        store.record_word_learning(WordLearningRecord::from_session(
            &candidate("erosion", "Old erosion sentence."),
            Local::now().date_naive(),
        ));

        let selection = Selector::new(&source, &mut store)
            .select_words(1, &["environment".into()], 7)
            .await;

        assert_eq!(selection.words.len(), 1);
        assert_eq!(selection.words[0].word, "fresh");

        // The do-not-reuse hint carries the history
        assert!(source.requests()[0]
            .avoid_words
            .contains(&"erosion".to_string()));
    }

    #[tokio::test]
    async fn test_stale_sentence_disqualifies_whole_candidate() {
        let source = ScriptedSource::new(vec![GeneratorResult::Ok(candidates(&[
            ("novel", "The logo is everywhere."),
            ("fresh", "A fresh sentence."),
        ]))]);
        let mut store = empty_store();
        store.record_word_learning(WordLearningRecord::from_session(
            &candidate("ubiquitous", "The logo is everywhere!"),
            Local::now().date_naive(),
        ));

        let selection = Selector::new(&source, &mut store)
            .select_words(1, &["business".into()], 7)
            .await;

        // "novel" itself is unused, but its sentence is not
        assert_eq!(selection.words.len(), 1);
        assert_eq!(selection.words[0].word, "fresh");
    }

    #[tokio::test]
    async fn test_duplicates_within_one_batch_are_dropped() {
        let source = ScriptedSource::new(vec![GeneratorResult::Ok(candidates(&[
            ("alpha", "Alpha one."),
            ("Alpha", "Alpha two."),
            ("beta", "Beta one."),
        ]))]);
        let mut store = empty_store();

        let selection = Selector::new(&source, &mut store)
            .select_words(3, &["science".into()], 7)
            .await;

        let words: Vec<&str> = selection.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_top_up_round_fills_shortfall() {
        let source = ScriptedSource::new(vec![
            GeneratorResult::Ok(candidates(&[("alpha", "Alpha one.")])),
            GeneratorResult::Ok(candidates(&[("beta", "Beta one."), ("gamma", "Gamma one.")])),
        ]);
        let mut store = empty_store();

        let selection = Selector::new(&source, &mut store)
            .select_words(2, &["education".into()], 7)
            .await;

        assert_eq!(selection.words.len(), 2);
        let requests = source.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].count, 4, "top-up asks for remaining + 3");
        // The hint goes out with the first call only
        assert!(requests[1].avoid_words.is_empty());
    }

    #[tokio::test]
    async fn test_only_round_zero_carries_the_avoid_hint() {
        let source = ScriptedSource::new(vec![
            GeneratorResult::Ok(candidates(&[("beta", "Beta one.")])),
            GeneratorResult::Ok(candidates(&[("gamma", "Gamma one.")])),
        ]);
        let mut store = empty_store();
        store.record_word_learning(WordLearningRecord::from_session(
            &candidate("alpha", "Alpha one."),
            Local::now().date_naive(),
        ));

        Selector::new(&source, &mut store)
            .select_words(2, &["science".into()], 7)
            .await;

        let requests = source.requests();
        assert!(requests[0].avoid_words.contains(&"alpha".to_string()));
        assert!(requests[1].avoid_words.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_only_rounds_do_not_end_the_loop() {
        // Rounds one and two return nothing but an already-used word; the
        // third round still runs and supplies the fresh one
        let source = ScriptedSource::new(vec![
            GeneratorResult::Ok(candidates(&[("stale", "Old stale sentence.")])),
            GeneratorResult::Ok(candidates(&[("stale", "Old stale sentence.")])),
            GeneratorResult::Ok(candidates(&[("fresh", "A fresh sentence.")])),
        ]);
        let mut store = empty_store();
        store.record_word_learning(WordLearningRecord::from_session(
            &candidate("stale", "Old stale sentence."),
            Local::now().date_naive(),
        ));

        let selection = Selector::new(&source, &mut store)
            .select_words(1, &["science".into()], 7)
            .await;

        assert_eq!(source.requests().len(), 3);
        assert_eq!(selection.words.len(), 1);
        assert_eq!(selection.words[0].word, "fresh");
    }

    #[tokio::test]
    async fn test_two_consecutive_failed_rounds_stop_the_loop() {
        let source = ScriptedSource::new(vec![
            GeneratorResult::ServiceError {
                status: Some(503),
                detail: "overloaded".into(),
            },
            GeneratorResult::Malformed {
                raw: "not json".into(),
                error: ParseError::MissingText,
            },
            GeneratorResult::Ok(candidates(&[("alpha", "Alpha one.")])),
        ]);
        let mut store = empty_store();

        let selection = Selector::new(&source, &mut store)
            .select_words(3, &["health".into()], 7)
            .await;

        assert!(selection.words.is_empty());
        assert!(selection.is_short());
        assert_eq!(source.requests().len(), 2, "third round never runs");
    }

    #[tokio::test]
    async fn test_accepted_words_are_recorded_immediately() {
        let source = ScriptedSource::new(vec![GeneratorResult::Ok(candidates(&[(
            "alpha",
            "Alpha one.",
        )]))]);
        let mut store = empty_store();

        Selector::new(&source, &mut store)
            .select_words(1, &["science".into()], 7)
            .await;

        assert!(store.is_word_used("alpha"));
        assert!(store.is_sentence_used("Alpha one."));
    }
}
