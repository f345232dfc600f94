//! Configuration management
//!
//! TOML file under the platform config directory with serde defaults for
//! every field, so an empty file and a missing file both mean "defaults".
//! The API key can always be overridden from the environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted before the config file for the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API key; the GEMINI_API_KEY environment variable wins over this
    pub api_key: Option<String>,
    /// Gemini model name
    pub model: String,
    /// Words per vocabulary session
    pub word_count: usize,
    /// Topics the vocabulary and article prompts draw from
    pub topics: Vec<String>,
    /// Key words extracted from each daily article
    pub article_key_words_count: usize,
    /// Trailing window (calendar days) for the anti-repeat filter
    pub exclude_days: u32,
    /// Override for the usage record location; defaults to the data directory
    pub usage_file: Option<PathBuf>,
    /// Directory HTML reports are written into; defaults to the working directory
    pub report_dir: Option<PathBuf>,
}

fn default_model() -> String {
    crate::generator::DEFAULT_MODEL.to_string()
}

fn default_word_count() -> usize {
    20
}

fn default_topics() -> Vec<String> {
    [
        "environment",
        "education",
        "technology",
        "health",
        "society",
        "culture",
        "economy",
        "science",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_article_key_words_count() -> usize {
    15
}

fn default_exclude_days() -> u32 {
    7
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            word_count: default_word_count(),
            topics: default_topics(),
            article_key_words_count: default_article_key_words_count(),
            exclude_days: default_exclude_days(),
            usage_file: None,
            report_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from file, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path
            .parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// The API key, environment first, config file second
    pub fn require_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        if let Some(key) = &self.api_key {
            if !key.trim().is_empty() {
                return Ok(key.clone());
            }
        }
        anyhow::bail!(
            "No Gemini API key configured. Set {API_KEY_ENV} or add api_key to {}",
            config_path().map(|p| p.display().to_string()).unwrap_or_default()
        )
    }

    /// Where the usage record lives
    pub fn usage_path(&self) -> Result<PathBuf> {
        match &self.usage_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("usage_record.json")),
        }
    }

    /// Where HTML reports are written
    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "ielts-trainer", "ielts-trainer")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "ielts-trainer", "ielts-trainer")
        .context("Failed to get project directories")?;
    Ok(base.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.word_count, 20);
        assert_eq!(config.exclude_days, 7);
        assert_eq!(config.article_key_words_count, 15);
        assert_eq!(config.model, crate::generator::DEFAULT_MODEL);
        assert!(!config.topics.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str("word_count = 5\ntopics = [\"art\"]").unwrap();
        assert_eq!(config.word_count, 5);
        assert_eq!(config.topics, vec!["art".to_string()]);
        assert_eq!(config.exclude_days, 7);
    }

    #[test]
    fn test_usage_file_override() {
        let config: Config = toml::from_str("usage_file = \"/tmp/usage.json\"").unwrap();
        assert_eq!(config.usage_path().unwrap(), PathBuf::from("/tmp/usage.json"));
    }
}
