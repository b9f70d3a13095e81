//! Prompt templates for the chat, summarization, and plan surfaces
//!
//! Each submodule builds the full prompt string for one surface. The
//! structured surfaces (summarize, plan) embed JSON format instructions so
//! the model's output can be parsed by [`crate::structured`].

pub mod chat;
pub mod plan;
pub mod summarize;

pub use chat::CHAT_SYSTEM_PROMPT;
pub use plan::{plan_prompt, plan_revision_prompt};
pub use summarize::summarize_prompt;
