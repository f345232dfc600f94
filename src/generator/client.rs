//! Gemini REST client
//!
//! One blocking round trip at a time against the generateContent endpoint.
//! Transient failures (429/5xx, timeouts, transport errors) retry with a
//! linearly increasing delay; everything else surfaces through
//! [`GeneratorResult`] for the caller to pattern-match.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::text::{strip_emphasis, strip_markdown};
use crate::types::{Article, VocabularyWord};

use super::{prompts, BatchRequest, CandidateSource, GeneratorResult, ParseError, ReviewSource};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Model used when the config does not name one
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Failures below the decode layer: the service said no, or we never
/// got an envelope we could read
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Gemini API error ({status}): {body}")]
    Service { status: u16, body: String },
    #[error("request failed after {attempts} attempts: {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not read response envelope: {error}")]
    Envelope { raw: String, error: ParseError },
}

impl GeneratorError {
    fn into_result<T>(self) -> GeneratorResult<T> {
        match self {
            GeneratorError::Service { status, body } => GeneratorResult::ServiceError {
                status: Some(status),
                detail: body,
            },
            GeneratorError::Transport { source, .. } => GeneratorResult::ServiceError {
                status: None,
                detail: source.to_string(),
            },
            GeneratorError::Envelope { raw, error } => GeneratorResult::Malformed { raw, error },
        }
    }
}

/// Client for the Gemini generative-language API
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Build a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Self::new(api_key, config.model.clone())
    }

    /// Submit a prompt and unwrap the generated text from the envelope.
    ///
    /// Retries 429/500/503 and transport failures up to [`MAX_RETRIES`]
    /// times, sleeping `attempt * 1s` between tries.
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [ { "parts": [ { "text": prompt } ] } ]
        });

        let mut attempt: u32 = 0;
        loop {
            let send_result = self.http.post(&url).json(&body).send().await;
            match send_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let raw = response.text().await.map_err(|source| {
                            GeneratorError::Transport { attempts: attempt + 1, source }
                        })?;
                        return extract_text(&raw)
                            .map_err(|error| GeneratorError::Envelope { raw, error });
                    }

                    let detail = response.text().await.unwrap_or_default();
                    if is_retryable(status) && attempt < MAX_RETRIES {
                        attempt += 1;
                        debug!("Gemini returned {status}, retry {attempt}/{MAX_RETRIES}");
                        tokio::time::sleep(retry_delay(attempt)).await;
                        continue;
                    }
                    return Err(GeneratorError::Service {
                        status: status.as_u16(),
                        body: detail,
                    });
                }
                Err(source) => {
                    if attempt < MAX_RETRIES {
                        attempt += 1;
                        debug!("Gemini request failed ({source}), retry {attempt}/{MAX_RETRIES}");
                        tokio::time::sleep(retry_delay(attempt)).await;
                        continue;
                    }
                    return Err(GeneratorError::Transport { attempts: attempt + 1, source });
                }
            }
        }
    }

    /// Score a batch of user translations in place.
    ///
    /// On `Ok`, each word's score, corrected translation, and explanation
    /// are filled from the response; failure variants leave them untouched.
    pub async fn evaluate_translations(
        &self,
        words: &mut [VocabularyWord],
    ) -> GeneratorResult<()> {
        if words.is_empty() {
            return GeneratorResult::Ok(());
        }
        let prompt = prompts::evaluate_translations(words);
        match self.generate(&prompt).await {
            Ok(text) => match decode_evaluations(&text, words.len()) {
                Ok(evaluations) => {
                    for (word, eval) in words.iter_mut().zip(evaluations) {
                        word.score = eval.score;
                        word.corrected_translation = eval.corrected_translation;
                        word.explanation = eval.explanation;
                    }
                    GeneratorResult::Ok(())
                }
                Err(error) => GeneratorResult::Malformed { raw: text, error },
            },
            Err(err) => err.into_result(),
        }
    }

    /// Correct translation for a single sentence (used for skipped items)
    pub async fn correct_translation(&self, sentence: &str) -> GeneratorResult<String> {
        let prompt = prompts::correct_translation(sentence);
        match self.generate(&prompt).await {
            Ok(text) => GeneratorResult::Ok(strip_markdown(&text)),
            Err(err) => err.into_result(),
        }
    }

    /// Generate the daily article body (title + content) for a topic
    pub async fn article(&self, topic: &str) -> GeneratorResult<Article> {
        let prompt = prompts::article(topic);
        match self.generate(&prompt).await {
            Ok(text) => match decode_article(&text) {
                Ok(mut article) => {
                    article.topic = topic.to_string();
                    GeneratorResult::Ok(article)
                }
                Err(error) => GeneratorResult::Malformed { raw: text, error },
            },
            Err(err) => err.into_result(),
        }
    }

    /// Chinese translation of the article content (plain text response)
    pub async fn article_translation(&self, content: &str) -> GeneratorResult<String> {
        let prompt = prompts::article_translation(content);
        match self.generate(&prompt).await {
            Ok(text) => GeneratorResult::Ok(strip_emphasis(text.trim())),
            Err(err) => err.into_result(),
        }
    }

    /// Key vocabulary extracted from the article content
    pub async fn key_words(&self, content: &str, count: usize) -> GeneratorResult<Vec<VocabularyWord>> {
        let prompt = prompts::key_words(content, count);
        match self.generate(&prompt).await {
            Ok(text) => match decode_vocabulary(&text) {
                Ok(words) => GeneratorResult::Ok(words),
                Err(error) => GeneratorResult::Malformed { raw: text, error },
            },
            Err(err) => err.into_result(),
        }
    }
}

#[async_trait]
impl CandidateSource for GeminiClient {
    async fn vocabulary_batch(&self, request: &BatchRequest) -> GeneratorResult<Vec<VocabularyWord>> {
        let prompt = prompts::vocabulary_batch(request);
        match self.generate(&prompt).await {
            Ok(text) => match decode_vocabulary(&text) {
                Ok(words) => GeneratorResult::Ok(words),
                Err(error) => {
                    warn!("Vocabulary batch did not decode: {error}");
                    GeneratorResult::Malformed { raw: text, error }
                }
            },
            Err(err) => err.into_result(),
        }
    }
}

#[async_trait]
impl ReviewSource for GeminiClient {
    async fn review_sentence_batch(&self, words: &[String]) -> GeneratorResult<HashMap<String, String>> {
        let prompt = prompts::review_sentence_batch(words);
        match self.generate(&prompt).await {
            Ok(text) => match decode_sentence_map(&text) {
                Ok(map) => GeneratorResult::Ok(map),
                Err(error) => GeneratorResult::Malformed { raw: text, error },
            },
            Err(err) => err.into_result(),
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::SERVICE_UNAVAILABLE
    )
}

fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_DELAY_MS * attempt as u64)
}

/// Unwrap `candidates[0].content.parts[0].text` from the response envelope
fn extract_text(body: &str) -> Result<String, ParseError> {
    let value: Value = serde_json::from_str(body)?;
    value
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|arr| arr.first())
        .and_then(|part| part.get("text"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
        .ok_or(ParseError::MissingText)
}

/// Drop surrounding ```json fences the model wraps payloads in
fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest.trim_start();
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest.trim_start();
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest.trim_end();
    }
    cleaned
}

fn decode_vocabulary(text: &str) -> Result<Vec<VocabularyWord>, ParseError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))?;
    if !value.is_array() {
        return Err(ParseError::UnexpectedShape {
            expected: "a JSON array of word objects",
        });
    }
    let mut words: Vec<VocabularyWord> = serde_json::from_value(value)?;
    for word in &mut words {
        word.sentence = strip_markdown(&word.sentence);
    }
    Ok(words)
}

fn decode_sentence_map(text: &str) -> Result<HashMap<String, String>, ParseError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))?;
    if !value.is_object() {
        return Err(ParseError::UnexpectedShape {
            expected: "a JSON object mapping word to sentence",
        });
    }
    Ok(serde_json::from_value(value)?)
}

#[derive(Debug)]
struct Evaluation {
    score: u8,
    corrected_translation: String,
    explanation: String,
}

fn decode_evaluations(text: &str, expected: usize) -> Result<Vec<Evaluation>, ParseError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))?;
    let Some(items) = value.as_array() else {
        return Err(ParseError::UnexpectedShape {
            expected: "a JSON array of evaluation objects",
        });
    };
    if items.len() != expected {
        return Err(ParseError::UnexpectedShape {
            expected: "one evaluation per input sentence",
        });
    }
    Ok(items
        .iter()
        .map(|item| Evaluation {
            score: item
                .get("score")
                .and_then(|s| s.as_u64())
                .map(|s| s.min(10) as u8)
                .unwrap_or(0),
            corrected_translation: item
                .get("correctedTranslation")
                .and_then(|v| v.as_str())
                .map(strip_markdown)
                .unwrap_or_default(),
            explanation: item
                .get("explanation")
                .and_then(|v| v.as_str())
                .map(strip_markdown)
                .unwrap_or_default(),
        })
        .collect())
}

fn decode_article(text: &str) -> Result<Article, ParseError> {
    let value: Value = serde_json::from_str(strip_code_fences(text))?;
    let (Some(title), Some(content)) = (
        value.get("title").and_then(|t| t.as_str()),
        value.get("content").and_then(|c| c.as_str()),
    ) else {
        return Err(ParseError::UnexpectedShape {
            expected: "a JSON object with title and content",
        });
    };
    Ok(Article {
        title: strip_markdown(title),
        // Emphasis only: the whitespace collapse would destroy paragraphs
        content: strip_emphasis(content),
        ..Article::default()
    })
}
