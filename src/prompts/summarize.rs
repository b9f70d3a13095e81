//! Summarization prompt with JSON format instructions

/// Build the summarization prompt for the given input text.
///
/// The model is instructed to answer with a single JSON object matching
/// [`crate::summarize::TextSummary`].
pub fn summarize_prompt(text: &str) -> String {
    format!(
        r#"You are a text summarizer. Given the following text, summarize it in 2-3 sentences.

{text}

Respond with a JSON object in a markdown code block, matching this schema exactly:
```json
{{
  "title": "string, the title of the summary",
  "summary": "string, the summary of the text in 2-3 sentences",
  "keyPoints": ["string", "the key points of the text"]
}}
```
Return ONLY the JSON object."#
    )
}
