//! In-memory usage record: flat dedup sets plus the dated learning log

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::types::WordLearningRecord;

/// Durable record of previously seen words and sentences.
///
/// Invariant: everything recorded through [`record_word`](Self::record_word) /
/// [`record_sentence`](Self::record_sentence) appears normalized in the
/// corresponding set, so membership tests and writes share one normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageRecord {
    used_words: HashSet<String>,
    used_sentences: HashSet<String>,
    daily_records: BTreeMap<String, Vec<WordLearningRecord>>,
    last_updated: DateTime<Local>,
}

impl Default for UsageRecord {
    fn default() -> Self {
        Self {
            used_words: HashSet::new(),
            used_sentences: HashSet::new(),
            daily_records: BTreeMap::new(),
            last_updated: Local::now(),
        }
    }
}

impl UsageRecord {
    /// Record a used word. Blank input is a no-op.
    pub fn record_word(&mut self, word: &str) {
        let key = normalize(word);
        if key.is_empty() {
            return;
        }
        self.used_words.insert(key);
        self.last_updated = Local::now();
    }

    /// Record a used example sentence. Blank input is a no-op.
    pub fn record_sentence(&mut self, sentence: &str) {
        let key = normalize(sentence);
        if key.is_empty() {
            return;
        }
        self.used_sentences.insert(key);
        self.last_updated = Local::now();
    }

    pub fn is_word_used(&self, word: &str) -> bool {
        let key = normalize(word);
        !key.is_empty() && self.used_words.contains(&key)
    }

    pub fn is_sentence_used(&self, sentence: &str) -> bool {
        let key = normalize(sentence);
        !key.is_empty() && self.used_sentences.contains(&key)
    }

    /// Append a learning record to the dated log.
    ///
    /// Dual-write: the flat sets get the word and sentence for fast lookups,
    /// the dated log keeps the full entry for historical review.
    pub fn record_word_learning(&mut self, record: WordLearningRecord) {
        self.record_word(&record.word);
        self.record_sentence(&record.sentence);
        self.daily_records
            .entry(record.date_key())
            .or_default()
            .push(record);
        self.last_updated = Local::now();
    }

    /// Normalized words learned within the trailing `days` calendar days.
    ///
    /// Boundary rule: calendar-day granularity with an inclusive cutoff — an
    /// entry dated exactly `days` ago is in range, `days + 1` ago is not.
    /// Unparseable date keys are skipped.
    pub fn used_words_in_range(&self, days: u32) -> HashSet<String> {
        self.collect_in_range(days, |record| normalize(&record.word))
    }

    /// Normalized sentences learned within the trailing `days` calendar days
    pub fn used_sentences_in_range(&self, days: u32) -> HashSet<String> {
        self.collect_in_range(days, |record| normalize(&record.sentence))
    }

    fn collect_in_range(
        &self,
        days: u32,
        key_of: impl Fn(&WordLearningRecord) -> String,
    ) -> HashSet<String> {
        let cutoff = Local::now().date_naive() - chrono::Duration::days(days as i64);
        let mut keys = HashSet::new();
        for (date_key, records) in &self.daily_records {
            let Ok(date) = NaiveDate::parse_from_str(date_key, "%Y-%m-%d") else {
                continue;
            };
            if date < cutoff {
                continue;
            }
            for record in records {
                let key = key_of(record);
                if !key.is_empty() {
                    keys.insert(key);
                }
            }
        }
        keys
    }

    /// Learning records for a specific date key, oldest first
    pub fn daily_records(&self, date_key: &str) -> &[WordLearningRecord] {
        self.daily_records
            .get(date_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Today's learning records
    pub fn today_records(&self) -> &[WordLearningRecord] {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        self.daily_records(&today)
    }

    /// Clear everything: flat sets and the dated log.
    ///
    /// The dated log is cleared too; a partial reset would keep suppressing
    /// words through the date-range queries after the flat sets were emptied.
    pub fn reset(&mut self) {
        self.used_words.clear();
        self.used_sentences.clear();
        self.daily_records.clear();
        self.last_updated = Local::now();
    }

    /// (word count, sentence count) across the flat sets
    pub fn statistics(&self) -> (usize, usize) {
        (self.used_words.len(), self.used_sentences.len())
    }

    pub fn last_updated(&self) -> DateTime<Local> {
        self.last_updated
    }
}
