//! IELTS Trainer - console vocabulary and reading trainer
//!
//! The core loop: fetch candidate vocabulary from the Gemini API, filter
//! out anything used in the recent past, quiz the user on translations,
//! score the answers, and render HTML reports. Everything the user has
//! seen is tracked in a durable usage record so sessions never repeat
//! words or example sentences within the exclusion window.
//!
//! # Example
//!
//! ```ignore
//! use ielts_trainer::generator::GeminiClient;
//! use ielts_trainer::selector::Selector;
//! use ielts_trainer::usage::UsageStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GeminiClient::new("api-key", "gemini-2.5-flash")?;
//!     let mut store = UsageStore::open("usage_record.json");
//!     let selection = Selector::new(&client, &mut store)
//!         .select_words(20, &["environment".into()], 7)
//!         .await;
//!     println!("{} fresh words", selection.words.len());
//!     Ok(())
//! }
//! ```

pub mod article;
pub mod cli;
pub mod config;
pub mod generator;
pub mod normalize;
pub mod report;
pub mod review;
pub mod selector;
pub mod session;
pub mod text;
pub mod types;
pub mod usage;

// Re-export commonly used types for convenience
pub use config::Config;
pub use generator::GeminiClient;
pub use selector::{Selection, Selector};
pub use types::{Article, VocabularyWord, WordLearningRecord};
pub use usage::{UsageRecord, UsageStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
