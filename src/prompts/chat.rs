//! System prompt for the interactive chat surface

/// Default system prompt sent with every chat turn.
///
/// Can be overridden per run via config or the `--system` flag.
pub const CHAT_SYSTEM_PROMPT: &str = r#"You are a friendly, human-like AI assistant.
Always format responses using clean Markdown with:
- Headings
- Bullet points
- Code blocks with language
- Tables when needed.
- Make response shorter and concise.
Include icons if needed:
- Use 💡 for tips
- Use ⚠️ for warnings
- Use ✅ for success
- Use 🚀 for sections
- Use ❌ for errors or DO NOT USE
Avoid unnecessary formatting."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_mentions_markdown_and_brevity() {
        assert!(CHAT_SYSTEM_PROMPT.contains("Markdown"));
        assert!(CHAT_SYSTEM_PROMPT.contains("concise"));
    }
}
