//! Command-line interface definition for Fitsage
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, summarization, plan generation, and
//! model inspection.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fitsage - Streaming AI chat assistant
///
/// Chat with an AI assistant, summarize text into structured JSON, and
/// generate schema-validated fitness plans from a health profile.
#[derive(Parser, Debug, Clone)]
#[command(name = "fitsage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Fitsage
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive streaming chat session
    Chat {
        /// Override the configured chat model
        #[arg(short, long)]
        model: Option<String>,

        /// Override the built-in system prompt
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Summarize text into a title, summary, and key points
    Summarize {
        /// Text to summarize (alternative to --file)
        text: Option<String>,

        /// Read the text from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the raw JSON instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Generate a fitness plan from a health profile
    Plan {
        /// Path to the profile file (YAML or JSON)
        #[arg(short, long)]
        profile: PathBuf,

        /// Write the plan JSON to a file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Revise an existing plan with this review text
        #[arg(long)]
        revise: Option<String>,

        /// Existing plan to revise (required with --revise)
        #[arg(long)]
        plan_file: Option<PathBuf>,

        /// Print the raw JSON instead of formatted tables
        #[arg(long)]
        json: bool,
    },

    /// Inspect the model registry
    Models {
        /// Model subcommand
        #[command(subcommand)]
        command: ModelCommand,
    },
}

/// Model registry subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ModelCommand {
    /// List available models
    List,

    /// Show the currently active models
    Current,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
