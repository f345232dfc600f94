//! Daily reading article flow

use anyhow::Result;
use rand::seq::IndexedRandom;
use tracing::warn;

use crate::config::Config;
use crate::generator::{GeminiClient, GeneratorResult};
use crate::report;

/// Generate the daily article for a random configured topic and write the
/// HTML report.
///
/// The article body is required; a failed translation or key-word pass
/// degrades the report instead of aborting it.
pub async fn run_article_session(client: &GeminiClient, config: &Config) -> Result<()> {
    let topic = config
        .topics
        .choose(&mut rand::rng())
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No topics configured"))?;

    println!("Generating today's article on: {topic}");

    let mut article = match client.article(&topic).await {
        GeneratorResult::Ok(article) => article,
        GeneratorResult::Malformed { error, .. } => {
            anyhow::bail!("Article response did not decode: {error}")
        }
        GeneratorResult::ServiceError { status, detail } => {
            anyhow::bail!("Article generation failed (status {status:?}): {detail}")
        }
    };

    println!("Translating the article...");
    match client.article_translation(&article.content).await {
        GeneratorResult::Ok(translation) => article.translation = translation,
        GeneratorResult::Malformed { error, .. } => {
            warn!("Article translation did not decode: {error}");
            println!("Translation unavailable; the report will show the original only.");
        }
        GeneratorResult::ServiceError { status, detail } => {
            warn!("Article translation failed (status {status:?}): {detail}");
            println!("Translation unavailable; the report will show the original only.");
        }
    }

    println!("Extracting key vocabulary...");
    match client
        .key_words(&article.content, config.article_key_words_count)
        .await
    {
        GeneratorResult::Ok(words) => article.key_words = words,
        GeneratorResult::Malformed { error, .. } => {
            warn!("Key word extraction did not decode: {error}");
        }
        GeneratorResult::ServiceError { status, detail } => {
            warn!("Key word extraction failed (status {status:?}): {detail}");
        }
    }

    let path = report::write_article_report(&config.report_dir(), &article)?;
    println!("Article report generated: {}", path.display());
    Ok(())
}
