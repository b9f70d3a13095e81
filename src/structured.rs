//! Structured-output parsing for model responses
//!
//! Providers are asked for JSON-only output but routinely wrap it in
//! Markdown code fences or pad it with prose. This module extracts the
//! JSON payload and deserializes it against a schema type.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

use crate::error::{FitsageError, Result};

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence regex is valid")
    })
}

/// Extract the JSON payload from raw model output.
///
/// Preference order: the first fenced code block, then the outermost
/// `{...}` span, then the trimmed input as-is.
pub fn extract_json_block(raw: &str) -> &str {
    if let Some(caps) = fence_regex().captures(raw) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str();
        }
    }
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            return &raw[start..=end];
        }
    }
    raw.trim()
}

/// Parse raw model output into a schema type.
///
/// # Errors
///
/// Returns `FitsageError::Structured` with the serde message when the
/// extracted payload does not match the schema.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let payload = extract_json_block(raw);
    serde_json::from_str(payload)
        .map_err(|e| FitsageError::Structured(format!("model output did not match schema: {e}")).into())
}
