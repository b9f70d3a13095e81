//! Fitsage - Streaming AI chat assistant library
//!
//! This library provides the core functionality for the Fitsage CLI: a
//! streaming conversation engine, structured text summarization, and
//! schema-validated fitness-plan generation over the same transport.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Conversation state machine, message model, attachments
//! - `transport`: Provider transport trait, HTTP + SSE implementation
//! - `prompts`: Prompt templates for chat, summarization, and plans
//! - `plan`: Health profile intake and the fitness-plan schema
//! - `summarize`: Text summary schema
//! - `structured`: JSON extraction from model output
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Subcommand handlers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fitsage::session::{ChatSession, UserInput};
//! use fitsage::transport::fake::ScriptedTransport;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let transport = Arc::new(ScriptedTransport::new());
//!     let mut session = ChatSession::new(transport);
//!     session.send(UserInput::text("hello"), |_| {}).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod plan;
pub mod prompts;
pub mod session;
pub mod structured;
pub mod summarize;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use error::{FitsageError, Result};
pub use session::{ChatSession, Message, SessionStatus, StopHandle, TurnOutcome, UserInput};
pub use transport::{DeltaEvent, DeltaStream, Transport};
