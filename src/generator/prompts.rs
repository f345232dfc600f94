//! Prompt builders for the Gemini API
//!
//! Every prompt that expects structured output spells out the exact JSON
//! shape and bans markdown emphasis; the model ignores the latter often
//! enough that output is still run through the stripper.

use crate::types::VocabularyWord;

use super::BatchRequest;

/// How many already-used words to show in the do-not-reuse hint
pub const AVOID_SAMPLE_LIMIT: usize = 30;

pub fn vocabulary_batch(request: &BatchRequest) -> String {
    let mut anti_repeat = String::new();
    if !request.avoid_words.is_empty() {
        let sample: Vec<&str> = request
            .avoid_words
            .iter()
            .take(AVOID_SAMPLE_LIMIT)
            .map(String::as_str)
            .collect();
        let overflow = request.avoid_words.len().saturating_sub(AVOID_SAMPLE_LIMIT);
        anti_repeat = format!(
            "\n\nIMPORTANT - AVOID REPETITION:\n\
             The following words have already been used. Please DO NOT use them:\n\
             {}{}\n\n\
             Please select COMPLETELY DIFFERENT words.",
            sample.join(", "),
            if overflow > 0 {
                format!("\n(And {overflow} more words)")
            } else {
                String::new()
            },
        );
    }

    format!(
        r#"You are an IELTS vocabulary expert. Please provide {count} IELTS core vocabulary words from the following topics: {topics}.

CRITICAL REQUIREMENTS:
1. Return EXACTLY {count} words (or as close as possible).
2. Select words commonly tested in IELTS examinations (band 6.5-8.0 level).
3. Ensure diversity in parts of speech (nouns, verbs, adjectives, adverbs, etc.).
4. Each word must be relevant to the given topics.
5. For each word, provide:
   - Accurate phonetics in American English pronunciation (IPA format, US pronunciation)
   - Chinese definition (including part of speech and comprehensive meaning)
   - A unique, natural example sentence that clearly demonstrates the word's usage
6. All example sentences must be unique and creative.
7. IMPORTANT: Do NOT use markdown formatting (no **, no *, no bold, no italic) in sentences. Use plain text only.{anti_repeat}

Return the response as a valid JSON array. Each object must have: "word", "phonetics", "definition", "sentence".

Example format:
[
  {{
    "word": "ubiquitous",
    "phonetics": "/juˈbɪkwɪtəs/",
    "definition": "adj. 普遍存在的；无所不在的",
    "sentence": "The company's logo has become ubiquitous all over the world."
  }}
]

Return the JSON array now:"#,
        count = request.count,
        topics = request.topics.join(", "),
    )
}

pub fn review_sentence_batch(words: &[String]) -> String {
    let word_list: Vec<String> = words.iter().map(|w| format!("\"{w}\"")).collect();
    format!(
        r#"Please generate NEW, DIFFERENT example sentences for the following IELTS vocabulary words.

For each word, provide a sentence that:
1. Clearly demonstrates the word's meaning and usage
2. Is natural and appropriate for IELTS level
3. Uses American English
4. Does NOT use markdown formatting (no **, no *, no bold, no italic)

Words: {}

Return the response as a valid JSON object where each key is a word and each value is the example sentence.

Example format:
{{
  "ubiquitous": "The company's logo has become ubiquitous all over the world.",
  "mitigate": "Governments must take action to mitigate the effects of climate change."
}}

Return the JSON object now:"#,
        word_list.join(", "),
    )
}

pub fn evaluate_translations(words: &[VocabularyWord]) -> String {
    let input: Vec<serde_json::Value> = words
        .iter()
        .map(|w| {
            serde_json::json!({
                "originalSentence": w.sentence,
                "userTranslation": w.user_translation,
            })
        })
        .collect();

    format!(
        r#"Please evaluate the following list of Chinese translations for the given English sentences.
For each sentence, provide a score from 1 to 10, a corrected Chinese translation, and a brief explanation for the score.
The input is a JSON array of objects, each containing the original sentence and the user's translation.
Return a valid JSON array of objects as your response, one per input, in the same order. Each object must have the following keys: "score", "correctedTranslation", "explanation".

Input:
{}"#,
        serde_json::Value::Array(input),
    )
}

pub fn correct_translation(sentence: &str) -> String {
    format!(
        r#"Please provide a correct and natural Chinese translation for the following English sentence.
Return only the Chinese translation, without any additional text, explanation, or formatting.

English sentence:
{sentence}

Chinese translation:"#,
    )
}

pub fn article(topic: &str) -> String {
    format!(
        r#"Please write a comprehensive IELTS-level English article about the topic: "{topic}".

Requirements:
1. The article should be 500-1000 words long.
2. The article should have a clear title.
3. The article should be well-structured with paragraphs.
4. Use appropriate IELTS-level vocabulary and expressions.
5. IMPORTANT: Do NOT use markdown formatting (no **, no *, no bold, no italic) in the article content. Use plain text only.

Return the response as a valid JSON object with the following keys:
- "title": the article title (in English)
- "content": the full article text (in English, preserve paragraph breaks with \n)"#,
    )
}

pub fn article_translation(content: &str) -> String {
    format!(
        r#"Please translate the following English article into Chinese.
Preserve the paragraph structure and formatting.
Return only the Chinese translation, without any additional text or formatting.

Article:
{content}"#,
    )
}

pub fn key_words(content: &str, count: usize) -> String {
    format!(
        r#"Please extract {count} key vocabulary words from the following article that are important for IELTS learners.

For each word, provide:
- Accurate phonetics in American English pronunciation (IPA format, US pronunciation)
- Chinese definition (including part of speech and comprehensive meaning)
- An example sentence from the article or a similar context

IMPORTANT FORMATTING RULES:
- Do NOT use markdown formatting (no **, no *, no bold, no italic) in sentences
- Use the word naturally in the sentence without any special formatting

Return the response as a valid JSON array. Each object must have the following keys: "word", "phonetics", "definition", "sentence".

Article:
{content}"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_prompt_includes_count_and_topics() {
        let prompt = vocabulary_batch(&BatchRequest {
            count: 12,
            topics: vec!["environment".into(), "education".into()],
            avoid_words: vec![],
        });
        assert!(prompt.contains("provide 12 IELTS core vocabulary words"));
        assert!(prompt.contains("environment, education"));
        assert!(!prompt.contains("AVOID REPETITION"));
    }

    #[test]
    fn test_vocabulary_prompt_caps_avoid_sample() {
        let avoid: Vec<String> = (0..40).map(|i| format!("word{i}")).collect();
        let prompt = vocabulary_batch(&BatchRequest {
            count: 5,
            topics: vec!["science".into()],
            avoid_words: avoid,
        });
        assert!(prompt.contains("AVOID REPETITION"));
        assert!(prompt.contains("word29"));
        assert!(!prompt.contains("word30,"));
        assert!(prompt.contains("(And 10 more words)"));
    }

    #[test]
    fn test_review_prompt_quotes_words() {
        let prompt = review_sentence_batch(&["erosion".into(), "mitigate".into()]);
        assert!(prompt.contains("\"erosion\", \"mitigate\""));
    }
}
