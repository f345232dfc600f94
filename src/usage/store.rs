//! File-backed usage store
//!
//! Loads `usage_record.json` at construction and writes the whole record
//! back after every mutation. Write-through, single-process access model:
//! there is no lock on the backing file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use super::UsageRecord;
use crate::types::WordLearningRecord;

/// Durable owner of the [`UsageRecord`].
///
/// Callers only read and mutate through these methods; no other component
/// holds a copy that could diverge. Load failures fall back to an empty
/// record and save failures are logged, never fatal.
pub struct UsageStore {
    path: PathBuf,
    record: UsageRecord,
}

impl UsageStore {
    /// Open the store at `path`, loading the existing record if present.
    ///
    /// A missing file starts an empty record; an unreadable or unparseable
    /// file does too, with a warning (prior history is lost, not the process).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match Self::load(&path) {
            Ok(Some(record)) => record,
            Ok(None) => UsageRecord::default(),
            Err(err) => {
                warn!("Failed to load usage record from {}: {err:#}, starting empty", path.display());
                UsageRecord::default()
            }
        };
        Self { path, record }
    }

    fn load(path: &Path) -> Result<Option<UsageRecord>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let record = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(record))
    }

    fn save(&self) {
        let result = serde_json::to_string_pretty(&self.record)
            .context("Failed to serialize usage record")
            .and_then(|json| {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                std::fs::write(&self.path, json)
                    .with_context(|| format!("Failed to write {}", self.path.display()))
            });
        if let Err(err) = result {
            warn!("Usage record not saved: {err:#}, continuing with in-memory state");
        }
    }

    pub fn record_word(&mut self, word: &str) {
        self.record.record_word(word);
        self.save();
    }

    pub fn record_sentence(&mut self, sentence: &str) {
        self.record.record_sentence(sentence);
        self.save();
    }

    pub fn is_word_used(&self, word: &str) -> bool {
        self.record.is_word_used(word)
    }

    pub fn is_sentence_used(&self, sentence: &str) -> bool {
        self.record.is_sentence_used(sentence)
    }

    /// Append a scored session item to the dated log and the flat sets
    pub fn record_word_learning(&mut self, record: WordLearningRecord) {
        self.record.record_word_learning(record);
        self.save();
    }

    /// Append a whole session's records, saving once
    pub fn record_word_learnings(&mut self, records: Vec<WordLearningRecord>) {
        for record in records {
            self.record.record_word_learning(record);
        }
        self.save();
    }

    pub fn used_words_in_range(&self, days: u32) -> HashSet<String> {
        self.record.used_words_in_range(days)
    }

    pub fn used_sentences_in_range(&self, days: u32) -> HashSet<String> {
        self.record.used_sentences_in_range(days)
    }

    pub fn daily_records(&self, date_key: &str) -> &[WordLearningRecord] {
        self.record.daily_records(date_key)
    }

    pub fn today_records(&self) -> &[WordLearningRecord] {
        self.record.today_records()
    }

    /// Clear the whole record (sets and dated log) and persist the empty state
    pub fn reset(&mut self) {
        self.record.reset();
        self.save();
    }

    /// (word count, sentence count)
    pub fn statistics(&self) -> (usize, usize) {
        self.record.statistics()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
