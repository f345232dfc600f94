//! Daily review report: one day's learning records with fresh review sentences

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::review::fallback_sentence;
use crate::types::WordLearningRecord;

use super::{escape_html, generated_at, score_class, write_report};

const STYLE: &str = r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 20px; min-height: 100vh; }
        .container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 15px; box-shadow: 0 20px 60px rgba(0,0,0,0.3); overflow: hidden; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 40px; text-align: center; }
        .header h1 { font-size: 2.5em; margin-bottom: 10px; }
        .header p { font-size: 1.1em; opacity: 0.9; }
        .content { padding: 40px; }
        .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 40px; }
        .stat-card { background: linear-gradient(135deg, #f5f7fa 0%, #c3cfe2 100%); padding: 25px; border-radius: 10px; text-align: center; box-shadow: 0 4px 6px rgba(0,0,0,0.1); }
        .stat-card h3 { color: #555; font-size: 0.9em; margin-bottom: 10px; text-transform: uppercase; }
        .stat-card .value { font-size: 2.5em; font-weight: bold; color: #667eea; margin: 0; }
        .section { margin-bottom: 40px; }
        .section h2 { color: #667eea; font-size: 1.8em; margin-bottom: 20px; padding-bottom: 10px; border-bottom: 3px solid #667eea; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { padding: 15px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; font-weight: 600; }
        tr:hover { background-color: #f5f5f5; }
        .word { font-weight: bold; color: #667eea; font-size: 1.1em; }
        .score { text-align: center; font-weight: bold; font-size: 1.2em; }
        .score-high { color: #28a745; }
        .score-medium { color: #ffc107; }
        .score-low { color: #dc3545; }
        .review-sentence { color: #28a745; font-style: italic; margin-top: 5px; }
        .footer { background: #f8f9fa; padding: 20px; text-align: center; color: #666; }"#;

struct DailyStats {
    total: usize,
    answered: usize,
    skipped: usize,
    average: f64,
    high: usize,
    medium: usize,
    low: usize,
}

/// Skipped items land in the "needs improvement" band alongside low-scoring
/// answers; the average covers answered items only
fn daily_stats(records: &[WordLearningRecord]) -> DailyStats {
    let answered: Vec<&WordLearningRecord> = records.iter().filter(|r| !r.skipped).collect();
    let skipped = records.len() - answered.len();
    let average = if answered.is_empty() {
        0.0
    } else {
        answered.iter().map(|r| r.score as f64).sum::<f64>() / answered.len() as f64
    };
    DailyStats {
        total: records.len(),
        answered: answered.len(),
        skipped,
        average,
        high: answered.iter().filter(|r| r.score >= 8).count(),
        medium: answered.iter().filter(|r| r.score >= 5 && r.score < 8).count(),
        low: skipped + answered.iter().filter(|r| r.score < 5).count(),
    }
}

pub fn render_daily_report(
    date_key: &str,
    records: &[WordLearningRecord],
    review_sentences: &HashMap<String, String>,
) -> String {
    let stats = daily_stats(records);

    let mut rows = String::new();
    for record in records {
        let review = review_sentences
            .get(&record.word)
            .cloned()
            .unwrap_or_else(|| fallback_sentence(&record.word));
        rows.push_str("                        <tr>\n");
        rows.push_str(&format!(
            "                            <td class=\"word\">{}</td>\n",
            escape_html(&record.word),
        ));
        rows.push_str(&format!(
            "                            <td>{}</td>\n",
            escape_html(&record.sentence),
        ));
        rows.push_str(&format!(
            "                            <td><span class=\"review-sentence\">{}</span></td>\n",
            escape_html(&review),
        ));
        rows.push_str(&format!(
            "                            <td>{}</td>\n",
            escape_html(&record.user_translation),
        ));
        rows.push_str(&format!(
            "                            <td>{}</td>\n",
            escape_html(&record.corrected_translation),
        ));
        rows.push_str(&format!(
            "                            <td class=\"score {}\">{}/10</td>\n",
            score_class(record.score),
            record.score,
        ));
        rows.push_str("                        </tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>IELTS 每日学习报告 - {date_key}</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>📚 IELTS 每日学习报告</h1>
            <p>学习日期: {date_key} | 报告生成时间: {generated}</p>
        </div>
        <div class="content">
            <div class="stats">
                <div class="stat-card"><h3>总单词数</h3><p class="value">{total}</p></div>
                <div class="stat-card"><h3>平均分数</h3><p class="value">{average:.1}/10</p></div>
                <div class="stat-card"><h3>已回答</h3><p class="value">{answered}</p></div>
                <div class="stat-card"><h3>跳过</h3><p class="value">{skipped}</p></div>
                <div class="stat-card"><h3>高分 (≥8)</h3><p class="value">{high}</p></div>
                <div class="stat-card"><h3>中等 (5-7)</h3><p class="value">{medium}</p></div>
                <div class="stat-card"><h3>需改进 (<5)</h3><p class="value">{low}</p></div>
            </div>
            <div class="section">
                <h2>📖 今日复习内容</h2>
                <table>
                    <thead>
                        <tr>
                            <th>单词</th>
                            <th>原始例句</th>
                            <th>复习例句</th>
                            <th>你的翻译</th>
                            <th>修正翻译</th>
                            <th>得分</th>
                        </tr>
                    </thead>
                    <tbody>
{rows}                    </tbody>
                </table>
            </div>
        </div>
        <div class="footer">
            <p>IELTS Trainer - 每日学习报告</p>
        </div>
    </div>
</body>
</html>
"#,
        generated = generated_at(),
        total = stats.total,
        average = stats.average,
        answered = stats.answered,
        skipped = stats.skipped,
        high = stats.high,
        medium = stats.medium,
        low = stats.low,
    )
}

/// Render and write the daily review report, returning its path
pub fn write_daily_report(
    dir: &Path,
    date_key: &str,
    records: &[WordLearningRecord],
    review_sentences: &HashMap<String, String>,
) -> Result<PathBuf> {
    write_report(
        dir,
        "IELTS_Daily_Report",
        &render_daily_report(date_key, records, review_sentences),
    )
}
