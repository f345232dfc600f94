//! Interactive vocabulary session and the daily review report flow

use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::config::Config;
use crate::generator::{GeminiClient, GeneratorResult};
use crate::report;
use crate::review::review_sentences;
use crate::selector::Selector;
use crate::types::{VocabularyWord, WordLearningRecord};
use crate::usage::UsageStore;

fn print_colored(text: &str, color: Color) -> Result<()> {
    execute!(stdout(), SetForegroundColor(color), Print(text), ResetColor)?;
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.dim} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run one full vocabulary session: select, quiz, evaluate, persist, report
pub async fn run_words_session(
    client: &GeminiClient,
    config: &Config,
    store: &mut UsageStore,
) -> Result<()> {
    println!("--- IELTS Trainer ---\n");

    let pb = spinner(&format!(
        "Fetching {} IELTS words for you...",
        config.word_count
    ));
    let selection = Selector::new(client, store)
        .select_words(config.word_count, &config.topics, config.exclude_days)
        .await;
    pb.finish_and_clear();

    if selection.words.is_empty() {
        anyhow::bail!(
            "Failed to fetch words. Please check your API key, network connection, and API quota."
        );
    }
    if selection.is_short() {
        print_colored(
            &format!(
                "Note: only {} of {} fresh words were available this session.\n",
                selection.words.len(),
                selection.requested
            ),
            Color::Yellow,
        )?;
    }
    println!(
        "\nSuccessfully fetched {} words. Let's begin!",
        selection.words.len()
    );
    println!("----------------------------------------------------\n");

    let mut words = selection.words;
    quiz(&mut words)?;

    println!("\nAll translations are complete. Evaluating your answers...");
    let pb = spinner("Evaluating...");
    let evaluation = client.evaluate_translations(&mut words).await;
    pb.finish_and_clear();
    match evaluation {
        GeneratorResult::Ok(()) => {}
        GeneratorResult::Malformed { error, .. } => {
            warn!("Evaluation response did not decode: {error}");
            println!("Evaluation failed; the report will not include scores.");
        }
        GeneratorResult::ServiceError { status, detail } => {
            warn!("Evaluation failed (status {status:?}): {detail}");
            println!("Evaluation failed; the report will not include scores.");
        }
    }

    finalize_skipped(client, &mut words).await;

    let today = Local::now().date_naive();
    let records: Vec<WordLearningRecord> = words
        .iter()
        .map(|word| WordLearningRecord::from_session(word, today))
        .collect();
    store.record_word_learnings(records);

    let path = report::write_words_report(&config.report_dir(), &words)?;
    print_colored(
        &format!("\nReport generated: {}\n", path.display()),
        Color::Green,
    )?;
    println!("\nThank you for using IELTS Trainer. See you next time!");
    Ok(())
}

/// Prompt for a translation of each sentence. "Pass" skips a question.
fn quiz(words: &mut [VocabularyWord]) -> Result<()> {
    let total = words.len();
    let mut editor = DefaultEditor::new().context("Failed to initialize line editor")?;

    for (index, word) in words.iter_mut().enumerate() {
        print_colored(&format!("\nQuestion {}/{total}\n", index + 1), Color::Cyan)?;

        print!("Word: ");
        print_colored(&format!("{}\n", word.word), Color::Green)?;
        print!("Phonetics: ");
        print_colored(&format!("{}\n", word.phonetics), Color::Yellow)?;
        println!("Definition: {}", word.definition);
        println!("\nPlease translate the following sentence into Chinese:");
        println!("{}", word.sentence);

        let input = match editor.readline("\nYour translation: ") {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                anyhow::bail!("Session cancelled")
            }
            Err(err) => return Err(err).context("Failed to read input"),
        };

        if input.eq_ignore_ascii_case("pass") {
            word.skipped = true;
            println!("Question skipped.");
        } else {
            word.user_translation = input;
        }
        println!("----------------------------------------------------");
    }
    Ok(())
}

/// Zero the score of skipped items and fetch a reference translation so
/// the report still teaches something for them
async fn finalize_skipped(client: &GeminiClient, words: &mut [VocabularyWord]) {
    for word in words.iter_mut().filter(|w| w.skipped) {
        word.score = 0;
        word.explanation = format!("(User skipped) {}", word.explanation)
            .trim_end()
            .to_string();
        if word.corrected_translation.is_empty() {
            match client.correct_translation(&word.sentence).await {
                GeneratorResult::Ok(translation) => word.corrected_translation = translation,
                GeneratorResult::Malformed { error, .. } => {
                    warn!("Reference translation for '{}' did not decode: {error}", word.word);
                }
                GeneratorResult::ServiceError { status, detail } => {
                    warn!(
                        "Reference translation for '{}' failed (status {status:?}): {detail}",
                        word.word
                    );
                }
            }
        }
    }
}

/// Build the daily review report for `date` (today when not given)
pub async fn run_daily_report(
    client: &GeminiClient,
    config: &Config,
    store: &UsageStore,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let date_key = date.format("%Y-%m-%d").to_string();
    let records = store.daily_records(&date_key);

    if records.is_empty() {
        println!("No learning records for {date_key}; nothing to report.");
        return Ok(());
    }

    // One word may be recorded more than once a day; review it once
    let mut words: Vec<String> = Vec::new();
    for record in records {
        if !record.word.trim().is_empty() && !words.contains(&record.word) {
            words.push(record.word.clone());
        }
    }

    let pb = spinner(&format!(
        "Generating review sentences for {} words...",
        words.len()
    ));
    let reviews = review_sentences(client, &words).await;
    pb.finish_and_clear();

    let path = report::write_daily_report(&config.report_dir(), &date_key, records, &reviews)?;
    print_colored(
        &format!("Daily report generated: {}\n", path.display()),
        Color::Green,
    )?;
    Ok(())
}
