//! Structured text summarization schema

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::structured::parse_structured;

/// Summary of a text: title, 2-3 sentence summary, and key points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSummary {
    pub title: String,
    pub summary: String,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<String>,
}

/// Parse a summary from raw model output
pub fn parse_summary_json(raw: &str) -> Result<TextSummary> {
    parse_structured(raw)
}
