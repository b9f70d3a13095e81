//! Special commands parser for interactive chat mode
//!
//! This module parses the slash commands available during a chat session:
//! editing and regenerating messages, copying message text, attaching
//! image files, clearing the conversation, and leaving the session.
//!
//! Commands are prefixed with `/`; the command word is case-insensitive
//! but arguments keep their original case.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Command was given an argument it cannot use
    #[error("Invalid argument for {command}: {arg}\n\nUsage: {usage}")]
    InvalidArgument {
        command: String,
        arg: String,
        usage: String,
    },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the session rather than being sent to the model.
/// Message numbers are the 1-based positions shown in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Display session status (message count, model, pending attachments)
    Status,

    /// Clear the conversation history
    Clear,

    /// Copy a message's text: `/copy <n>`
    Copy(usize),

    /// Edit a prior user message and resend: `/edit <n> <new text>`
    Edit { index: usize, text: String },

    /// Regenerate the last assistant response: `/regen`
    Regen,

    /// Stage an image attachment for the next message: `/attach <path>`
    Attach(PathBuf),

    /// Drop all staged attachments: `/detach`
    Detach,

    /// Exit the interactive session
    Quit,

    /// Not a special command; send as a chat message
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a valid command, and `MissingArgument`/`InvalidArgument` when a
/// command's arguments do not parse.
///
/// # Examples
///
/// ```
/// use fitsage::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/regen").unwrap();
/// assert_eq!(cmd, SpecialCommand::Regen);
///
/// let cmd = parse_special_command("hello there").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/bogus").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/help" | "/?" => return Ok(SpecialCommand::Help),
        "/status" => return Ok(SpecialCommand::Status),
        "/clear" => return Ok(SpecialCommand::Clear),
        "/regen" | "/regenerate" => return Ok(SpecialCommand::Regen),
        "/detach" => return Ok(SpecialCommand::Detach),
        "/quit" | "/exit" | "exit" | "quit" => return Ok(SpecialCommand::Quit),
        "/copy" => {
            return Err(CommandError::MissingArgument {
                command: "/copy".to_string(),
                usage: "/copy <message number>".to_string(),
            })
        }
        "/edit" => {
            return Err(CommandError::MissingArgument {
                command: "/edit".to_string(),
                usage: "/edit <message number> <new text>".to_string(),
            })
        }
        "/attach" => {
            return Err(CommandError::MissingArgument {
                command: "/attach".to_string(),
                usage: "/attach <path to image>".to_string(),
            })
        }
        _ => {}
    }

    if let Some(rest) = strip_command(trimmed, "/copy ") {
        let arg = rest.trim();
        return match arg.parse::<usize>() {
            Ok(n) if n > 0 => Ok(SpecialCommand::Copy(n)),
            _ => Err(CommandError::InvalidArgument {
                command: "/copy".to_string(),
                arg: arg.to_string(),
                usage: "/copy <message number>".to_string(),
            }),
        };
    }

    if let Some(rest) = strip_command(trimmed, "/edit ") {
        let rest = rest.trim();
        let (number, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let index = number.parse::<usize>().map_err(|_| CommandError::InvalidArgument {
            command: "/edit".to_string(),
            arg: number.to_string(),
            usage: "/edit <message number> <new text>".to_string(),
        })?;
        if index == 0 || text.trim().is_empty() {
            return Err(CommandError::MissingArgument {
                command: "/edit".to_string(),
                usage: "/edit <message number> <new text>".to_string(),
            });
        }
        return Ok(SpecialCommand::Edit {
            index,
            text: text.trim().to_string(),
        });
    }

    if let Some(rest) = strip_command(trimmed, "/attach ") {
        let path = rest.trim();
        if path.is_empty() {
            return Err(CommandError::MissingArgument {
                command: "/attach".to_string(),
                usage: "/attach <path to image>".to_string(),
            });
        }
        return Ok(SpecialCommand::Attach(PathBuf::from(path)));
    }

    Err(CommandError::UnknownCommand(trimmed.to_string()))
}

/// Case-insensitive prefix strip that preserves the argument's case
fn strip_command<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    if input.len() >= prefix.len() && input[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&input[prefix.len()..])
    } else {
        None
    }
}

/// Help text listing all slash commands
pub fn help_text() -> String {
    r#"Available commands:
  /help                      Show this help
  /status                    Show session status
  /clear                     Clear the conversation
  /copy <n>                  Print message n's text for copying
  /edit <n> <new text>       Edit user message n and resend
  /regen                     Regenerate the last response
  /attach <path>             Stage an image (max 1 MiB) for the next message
  /detach                    Drop staged attachments
  /quit                      Exit (also: exit, quit, Ctrl-D)

Press Ctrl-C while a response is streaming to stop it."#
        .to_string()
}
