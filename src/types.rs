//! Shared types used across modules
//!
//! This module contains the vocabulary and article models that are shared
//! between the generator, selector, session, and report modules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A vocabulary item: word/definition/sentence triple plus session state.
///
/// The generator fills `word`, `phonetics`, `definition`, and `sentence`;
/// the quiz session fills the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VocabularyWord {
    pub word: String,
    pub phonetics: String,
    pub definition: String,
    pub sentence: String,
    pub user_translation: String,
    pub score: u8,
    pub corrected_translation: String,
    pub explanation: String,
    pub skipped: bool,
}

impl VocabularyWord {
    /// Build a candidate triple as the generator returns it
    pub fn candidate(
        word: impl Into<String>,
        definition: impl Into<String>,
        sentence: impl Into<String>,
    ) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
            sentence: sentence.into(),
            ..Self::default()
        }
    }
}

/// A generated daily reading article with translation and key vocabulary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub translation: String,
    pub topic: String,
    pub key_words: Vec<VocabularyWord>,
}

/// One entry per vocabulary item presented in a session.
///
/// Created when a session item is scored; immutable thereafter and retained
/// indefinitely inside the usage record's dated log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordLearningRecord {
    pub word: String,
    pub sentence: String,
    pub date: NaiveDate,
    pub score: u8,
    pub user_translation: String,
    pub corrected_translation: String,
    pub explanation: String,
    #[serde(default)]
    pub skipped: bool,
}

impl WordLearningRecord {
    /// Date key used to partition the dated learning log (`YYYY-MM-DD`)
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Capture the outcome of one scored quiz item
    pub fn from_session(word: &VocabularyWord, date: NaiveDate) -> Self {
        Self {
            word: word.word.clone(),
            sentence: word.sentence.clone(),
            date,
            score: word.score,
            user_translation: word.user_translation.clone(),
            corrected_translation: word.corrected_translation.clone(),
            explanation: word.explanation.clone(),
            skipped: word.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_format() {
        let record = WordLearningRecord {
            word: "ubiquitous".into(),
            sentence: "The logo is ubiquitous.".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            score: 8,
            user_translation: String::new(),
            corrected_translation: String::new(),
            explanation: String::new(),
            skipped: false,
        };
        assert_eq!(record.date_key(), "2026-03-07");
    }

    #[test]
    fn test_vocabulary_word_deserializes_generator_payload() {
        // The generator returns only the four content fields
        let json = r#"{
            "word": "mitigate",
            "phonetics": "/ˈmɪtɪˌɡeɪt/",
            "definition": "v. 减轻；缓解",
            "sentence": "Governments must act to mitigate climate change."
        }"#;
        let word: VocabularyWord = serde_json::from_str(json).unwrap();
        assert_eq!(word.word, "mitigate");
        assert_eq!(word.score, 0);
        assert!(!word.skipped);
        assert!(word.user_translation.is_empty());
    }
}
