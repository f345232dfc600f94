//! CLI interface for ielts-trainer

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::article;
use crate::config::Config;
use crate::generator::GeminiClient;
use crate::session;
use crate::usage::UsageStore;

#[derive(Parser)]
#[command(name = "ielts-trainer")]
#[command(about = "Console IELTS vocabulary and reading trainer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a vocabulary translation session (the default)
    Words {
        /// Number of words this session (overrides the config)
        #[arg(short, long)]
        count: Option<usize>,
        /// Comma-separated topics to draw from (overrides the config)
        #[arg(short, long, value_delimiter = ',')]
        topics: Vec<String>,
    },
    /// Generate today's reading article report
    Article,
    /// Generate the daily review report
    DailyReport {
        /// Date to report on (YYYY-MM-DD); today when omitted
        date: Option<NaiveDate>,
    },
    /// Show usage statistics
    Stats,
    /// Clear all usage history
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;

    let command = cli.command.unwrap_or(Commands::Words {
        count: None,
        topics: Vec::new(),
    });

    match command {
        Commands::Words { count, topics } => {
            if let Some(count) = count {
                anyhow::ensure!(count >= 1, "--count must be at least 1");
                config.word_count = count;
            }
            let topics: Vec<String> = topics
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !topics.is_empty() {
                config.topics = topics;
            }
            anyhow::ensure!(!config.topics.is_empty(), "At least one topic is required");

            let client = GeminiClient::from_config(&config)?;
            let mut store = UsageStore::open(config.usage_path()?);
            session::run_words_session(&client, &config, &mut store).await
        }
        Commands::Article => {
            let client = GeminiClient::from_config(&config)?;
            article::run_article_session(&client, &config).await
        }
        Commands::DailyReport { date } => {
            let client = GeminiClient::from_config(&config)?;
            let store = UsageStore::open(config.usage_path()?);
            session::run_daily_report(&client, &config, &store, date).await
        }
        Commands::Stats => show_stats(&config),
        Commands::Reset { yes } => reset_history(&config, yes),
    }
}

fn show_stats(config: &Config) -> Result<()> {
    let store = UsageStore::open(config.usage_path()?);
    let (words, sentences) = store.statistics();
    println!("Usage statistics");
    println!("  Used words:     {words}");
    println!("  Used sentences: {sentences}");
    println!("  Learned today:  {}", store.today_records().len());
    println!("  Record file:    {}", store.path().display());
    Ok(())
}

fn reset_history(config: &Config, yes: bool) -> Result<()> {
    let mut store = UsageStore::open(config.usage_path()?);
    let (words, sentences) = store.statistics();

    if !yes {
        println!(
            "This permanently clears {words} used words, {sentences} used sentences, \
             and the whole learning log."
        );
        print!("Type 'yes' to continue: ");
        use std::io::Write;
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.reset();
    println!("Usage history cleared.");
    Ok(())
}
