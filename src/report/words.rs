//! Session report: one scored row per quizzed word

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::types::VocabularyWord;

use super::{escape_html, generated_at, score_class, write_report};

const STYLE: &str = r#"        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; margin: 0; background-color: #f0f2f5; }
        .container { max-width: 1000px; margin: 20px auto; padding: 20px; background-color: #fff; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #1c2a38; text-align: center; }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin: 20px 0; }
        .stat-card { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 8px; text-align: center; }
        .stat-card h3 { margin: 0 0 10px 0; font-size: 0.9em; opacity: 0.9; }
        .stat-card .value { font-size: 2em; font-weight: bold; margin: 0; }
        .stat-card.secondary { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); }
        .stat-card.success { background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%); }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { padding: 12px 15px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #4a6fa5; color: white; }
        tr:nth-child(even) { background-color: #f8f9fa; }
        .score { font-weight: bold; text-align: center; }
        .score-high { color: #28a745; }
        .score-medium { color: #ffc107; }
        .score-low { color: #dc3545; }
        .details { font-size: 0.9em; color: #555; }"#;

struct SessionStats {
    total: usize,
    answered: usize,
    skipped: usize,
    average: f64,
    high: usize,
    medium: usize,
    low: usize,
}

/// Score bands count answered items only; skipped items show up in their
/// own card, not in "needs improvement"
fn session_stats(words: &[VocabularyWord]) -> SessionStats {
    let answered: Vec<&VocabularyWord> = words.iter().filter(|w| !w.skipped).collect();
    let average = if answered.is_empty() {
        0.0
    } else {
        answered.iter().map(|w| w.score as f64).sum::<f64>() / answered.len() as f64
    };
    SessionStats {
        total: words.len(),
        answered: answered.len(),
        skipped: words.len() - answered.len(),
        average,
        high: answered.iter().filter(|w| w.score >= 8).count(),
        medium: answered.iter().filter(|w| w.score >= 5 && w.score < 8).count(),
        low: answered.iter().filter(|w| w.score < 5).count(),
    }
}

pub fn render_words_report(words: &[VocabularyWord]) -> String {
    let stats = session_stats(words);

    let mut rows = String::new();
    for word in words {
        let translation_cell = if word.skipped {
            "<em style='color:#999'>Skipped</em>".to_string()
        } else {
            escape_html(&word.user_translation)
        };
        rows.push_str("                <tr>\n");
        rows.push_str(&format!(
            "                    <td><div class='details'><strong>{}</strong> ({})</div>{}</td>\n",
            escape_html(&word.word),
            escape_html(&word.phonetics),
            escape_html(&word.sentence),
        ));
        rows.push_str(&format!("                    <td>{translation_cell}</td>\n"));
        rows.push_str(&format!(
            "                    <td><div>{}</div><div class='details'>{}</div></td>\n",
            escape_html(&word.corrected_translation),
            escape_html(&word.explanation),
        ));
        rows.push_str(&format!(
            "                    <td class='score {}'>{}/10</td>\n",
            score_class(word.score),
            word.score,
        ));
        rows.push_str("                </tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>IELTS Learning Report</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="container">
        <h1>IELTS Vocabulary Translation Report</h1>
        <div class="stats">
            <div class="stat-card"><h3>平均分数</h3><p class="value">{average:.1}/10</p></div>
            <div class="stat-card secondary"><h3>总题目数</h3><p class="value">{total}</p></div>
            <div class="stat-card success"><h3>已回答</h3><p class="value">{answered}</p></div>
            <div class="stat-card"><h3>跳过</h3><p class="value">{skipped}</p></div>
            <div class="stat-card secondary"><h3>高分 (≥8)</h3><p class="value">{high}</p></div>
            <div class="stat-card success"><h3>中等 (5-7)</h3><p class="value">{medium}</p></div>
            <div class="stat-card"><h3>需改进 (<5)</h3><p class="value">{low}</p></div>
        </div>
        <table>
            <thead>
                <tr>
                    <th>Original Sentence & Word</th>
                    <th>Your Translation</th>
                    <th>Corrected Translation & Explanation</th>
                    <th style="text-align: center;">Score</th>
                </tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
        <div style="margin-top: 20px; text-align: center; color: #666; font-size: 0.9em;">
            报告生成时间: {generated}
        </div>
    </div>
</body>
</html>
"#,
        average = stats.average,
        total = stats.total,
        answered = stats.answered,
        skipped = stats.skipped,
        high = stats.high,
        medium = stats.medium,
        low = stats.low,
        generated = generated_at(),
    )
}

/// Render and write the session report, returning its path
pub fn write_words_report(dir: &Path, words: &[VocabularyWord]) -> Result<PathBuf> {
    write_report(dir, "IELTS_Report", &render_words_report(words))
}
