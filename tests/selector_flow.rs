//! End-to-end selection and review flows against a scripted generator

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Local;

use ielts_trainer::generator::{
    BatchRequest, CandidateSource, GeneratorResult, ReviewSource,
};
use ielts_trainer::report::render_daily_report;
use ielts_trainer::review::review_sentences;
use ielts_trainer::selector::Selector;
use ielts_trainer::types::{VocabularyWord, WordLearningRecord};
use ielts_trainer::usage::UsageStore;

struct ScriptedSource {
    responses: Mutex<VecDeque<Vec<VocabularyWord>>>,
    requests: Mutex<Vec<BatchRequest>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Vec<VocabularyWord>>) -> Self {
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
        match self.responses.lock().unwrap().pop_front() {
            Some(words) => GeneratorResult::Ok(words),
            None => GeneratorResult::Ok(Vec::new()),
        }
    }
}

struct MapSource(HashMap<String, String>);

#[async_trait]
impl ReviewSource for MapSource {
    async fn review_sentence_batch(
        &self,
        _words: &[String],
    ) -> GeneratorResult<HashMap<String, String>> {
        GeneratorResult::Ok(self.0.clone())
    }
}

fn candidate(word: &str, sentence: &str) -> VocabularyWord {
    VocabularyWord::candidate(word, "def.", sentence)
}

#[tokio::test]
async fn one_clean_batch_fills_the_whole_request() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = UsageStore::open(dir.path().join("usage_record.json"));

    let source = ScriptedSource::new(vec![vec![
        candidate("erosion", "Sentence one."),
        candidate("mitigate", "Sentence two."),
        candidate("ubiquitous", "Sentence three."),
        candidate("coherent", "Sentence four."),
        candidate("viable", "Sentence five."),
    ]]);

    let selection = Selector::new(&source, &mut store)
        .select_words(5, &["science".into()], 7)
        .await;

    assert_eq!(selection.words.len(), 5);
    assert!(!selection.is_short());
    assert_eq!(source.requests().len(), 1);
    for word in &selection.words {
        assert!(store.is_word_used(&word.word));
        assert!(store.is_sentence_used(&word.sentence));
    }
}

#[tokio::test]
async fn second_session_never_repeats_the_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage_record.json");

    // Session one takes both offered words
    {
        let source = ScriptedSource::new(vec![vec![
            candidate("erosion", "Coastal erosion is serious."),
            candidate("mitigate", "We must mitigate the damage."),
        ]]);
        let mut store = UsageStore::open(&path);
        let selection = Selector::new(&source, &mut store)
            .select_words(2, &["environment".into()], 7)
            .await;
        assert_eq!(selection.words.len(), 2);

        let today = Local::now().date_naive();
        let records: Vec<WordLearningRecord> = selection
            .words
            .iter()
            .map(|w| WordLearningRecord::from_session(w, today))
            .collect();
        store.record_word_learnings(records);
    }

    // Session two reopens the store: yesterday's words are filtered and a
    // top-up round covers the shortfall
    let source = ScriptedSource::new(vec![
        vec![
            candidate("Erosion", "Another erosion sentence."),
            candidate("ubiquitous", "The logo is ubiquitous."),
        ],
        vec![candidate("coherent", "A coherent essay scores well.")],
    ]);
    let mut store = UsageStore::open(&path);
    let selection = Selector::new(&source, &mut store)
        .select_words(2, &["environment".into()], 7)
        .await;

    let words: Vec<&str> = selection.words.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(words, vec!["ubiquitous", "coherent"]);

    let requests = source.requests();
    assert!(requests[0].avoid_words.contains(&"erosion".to_string()));
    assert!(requests[0].avoid_words.contains(&"mitigate".to_string()));
}

#[tokio::test]
async fn expired_history_is_selectable_again() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage_record.json");

    let mut store = UsageStore::open(&path);
    store.record_word_learning(WordLearningRecord {
        word: "erosion".into(),
        sentence: "Old erosion sentence.".into(),
        date: Local::now().date_naive() - chrono::Duration::days(30),
        score: 6,
        user_translation: String::new(),
        corrected_translation: String::new(),
        explanation: String::new(),
        skipped: false,
    });

    let source = ScriptedSource::new(vec![vec![candidate(
        "erosion",
        "A brand new erosion sentence.",
    )]]);
    let selection = Selector::new(&source, &mut store)
        .select_words(1, &["environment".into()], 7)
        .await;

    assert_eq!(selection.words.len(), 1, "a word outside the window is fresh again");
    assert!(source.requests()[0].avoid_words.is_empty());
}

#[tokio::test]
async fn daily_report_covers_every_learned_word() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("usage_record.json");
    let today = Local::now().date_naive();
    let date_key = today.format("%Y-%m-%d").to_string();

    let mut store = UsageStore::open(&path);
    for (word, score, skipped) in [("erosion", 8, false), ("mitigate", 0, true)] {
        store.record_word_learning(WordLearningRecord {
            word: word.into(),
            sentence: format!("Old {word} sentence."),
            date: today,
            score,
            user_translation: String::new(),
            corrected_translation: String::new(),
            explanation: String::new(),
            skipped,
        });
    }

    // The batch only knows one of the two words
    let mut map = HashMap::new();
    map.insert("erosion".to_string(), "Fresh erosion sentence.".to_string());
    let source = MapSource(map);

    let words = vec!["erosion".to_string(), "mitigate".to_string()];
    let reviews = review_sentences(&source, &words).await;
    let html = render_daily_report(&date_key, store.daily_records(&date_key), &reviews);

    assert!(html.contains("Fresh erosion sentence."));
    assert!(html.contains("Review the usage of: mitigate"));
    assert!(html.contains("Old mitigate sentence."));
}
