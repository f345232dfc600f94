//! Daily article report: original text, translation, and key vocabulary

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::types::Article;

use super::{escape_html, generated_at, write_report};

const STYLE: &str = r#"        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif; margin: 0; background-color: #f0f2f5; line-height: 1.6; }
        .container { max-width: 1200px; margin: 20px auto; padding: 20px; background-color: #fff; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #1c2a38; text-align: center; border-bottom: 3px solid #4a6fa5; padding-bottom: 10px; }
        h2 { color: #2c3e50; margin-top: 30px; border-left: 4px solid #4a6fa5; padding-left: 15px; }
        .topic { text-align: center; color: #7f8c8d; font-style: italic; margin-bottom: 20px; }
        .article-section { margin: 30px 0; }
        .article-content { background-color: #f8f9fa; padding: 20px; border-radius: 5px; white-space: pre-wrap; font-size: 1.1em; }
        .translation { background-color: #e8f4f8; padding: 20px; border-radius: 5px; white-space: pre-wrap; font-size: 1.1em; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { padding: 12px 15px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #4a6fa5; color: white; }
        tr:nth-child(even) { background-color: #f8f9fa; }
        .word { font-weight: bold; color: #2c3e50; }
        .phonetics { color: #7f8c8d; font-style: italic; }
        .definition { color: #555; }
        .sentence { color: #2c3e50; font-style: italic; margin-top: 5px; }"#;

fn render_article_report(article: &Article) -> String {
    let mut rows = String::new();
    for word in &article.key_words {
        rows.push_str("                    <tr>\n");
        rows.push_str(&format!(
            "                        <td class=\"word\">{}</td>\n",
            escape_html(&word.word),
        ));
        rows.push_str(&format!(
            "                        <td class=\"phonetics\">{}</td>\n",
            escape_html(&word.phonetics),
        ));
        rows.push_str(&format!(
            "                        <td class=\"definition\">{}</td>\n",
            escape_html(&word.definition),
        ));
        rows.push_str(&format!(
            "                        <td class=\"sentence\">{}</td>\n",
            escape_html(&word.sentence),
        ));
        rows.push_str("                    </tr>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>IELTS Daily Article</title>
    <style>
{STYLE}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="topic">主题: {topic}</div>
        <div class="article-section">
            <h2>英文原文</h2>
            <div class="article-content">{content}</div>
        </div>
        <div class="article-section">
            <h2>中文翻译</h2>
            <div class="translation">{translation}</div>
        </div>
        <div class="article-section">
            <h2>重点词汇</h2>
            <table>
                <thead>
                    <tr>
                        <th>单词</th>
                        <th>音标</th>
                        <th>释义</th>
                        <th>例句</th>
                    </tr>
                </thead>
                <tbody>
{rows}                </tbody>
            </table>
        </div>
        <div style="margin-top: 20px; text-align: center; color: #666; font-size: 0.9em;">
            报告生成时间: {generated}
        </div>
    </div>
</body>
</html>
"#,
        title = escape_html(&article.title),
        topic = escape_html(&article.topic),
        content = escape_html(&article.content).replace('\n', "<br>"),
        translation = escape_html(&article.translation).replace('\n', "<br>"),
        generated = generated_at(),
    )
}

/// Render and write the article report, returning its path
pub fn write_article_report(dir: &Path, article: &Article) -> Result<PathBuf> {
    write_report(dir, "IELTS_Article", &render_article_report(article))
}
