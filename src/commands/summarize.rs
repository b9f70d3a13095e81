//! Text summarization command handler

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use crate::config::Config;
use crate::error::{FitsageError, Result};
use crate::prompts::summarize_prompt;
use crate::summarize::{parse_summary_json, TextSummary};

/// Summarize text from an argument or a file
///
/// # Errors
///
/// Returns an error when no input is given, the file cannot be read, the
/// provider call fails, or the response does not match the summary schema.
pub async fn run_summarize(
    config: Config,
    text: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let input = match (text, file) {
        (Some(text), None) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (Some(_), Some(_)) => {
            return Err(FitsageError::Config(
                "give either text or --file, not both".to_string(),
            )
            .into())
        }
        (None, None) => {
            return Err(FitsageError::Config(
                "nothing to summarize: pass text or --file".to_string(),
            )
            .into())
        }
    };
    if input.trim().is_empty() {
        return Err(FitsageError::Config("input text is empty".to_string()).into());
    }

    info!(chars = input.len(), "summarizing text");
    eprintln!("{}", "Summarizing...".cyan());

    let transport = Arc::new(super::build_chat_transport(&config, None, None)?);
    let raw = super::one_shot(transport, summarize_prompt(&input)).await?;
    let summary = parse_summary_json(&raw)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &TextSummary) {
    println!("\n{}\n", summary.title.bold());
    println!("{}\n", summary.summary);
    if !summary.key_points.is_empty() {
        println!("{}", "Key points:".bold());
        for point in &summary.key_points {
            println!("  - {point}");
        }
        println!();
    }
}
