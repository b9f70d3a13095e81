//! Interactive chat mode handler
//!
//! Runs a readline loop over a single [`ChatSession`]: plain input is sent
//! as a turn and rendered delta by delta, slash commands act on the
//! session, and Ctrl-C during a response stops the stream without killing
//! the REPL.

use std::io::Write as _;
use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

use crate::commands::special_commands::{help_text, parse_special_command, SpecialCommand};
use crate::config::Config;
use crate::error::Result;
use crate::session::{Attachment, ChatSession, SessionStatus, UserInput};
use crate::transport::DeltaEvent;

/// Start interactive chat mode
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `model` - Optional override for the configured chat model
/// * `system` - Optional override for the system prompt
pub async fn run_chat(config: Config, model: Option<String>, system: Option<String>) -> Result<()> {
    info!("Starting interactive chat mode");

    let model_name = model
        .clone()
        .unwrap_or_else(|| config.provider.chat_model.clone());
    let transport = Arc::new(super::build_chat_transport(&config, model, system)?);
    let mut session = ChatSession::new(transport);

    let mut rl = DefaultEditor::new()?;
    let mut pending: Vec<Attachment> = Vec::new();

    println!(
        "{} model: {} (type {} for commands, Ctrl-C stops a response)\n",
        "fitsage chat".bold(),
        model_name.cyan(),
        "/help".green()
    );

    loop {
        let prompt = format_prompt(session.status(), pending.len());
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let command = match parse_special_command(trimmed) {
                    Ok(cmd) => cmd,
                    Err(err) => {
                        eprintln!("{}", err.to_string().red());
                        continue;
                    }
                };

                match command {
                    SpecialCommand::Help => {
                        println!("{}\n", help_text());
                    }
                    SpecialCommand::Status => {
                        print_status(&session, &model_name, &pending);
                    }
                    SpecialCommand::Clear => {
                        if let Err(err) = session.clear() {
                            eprintln!("{}", format!("Error: {err}").red());
                        } else {
                            pending.clear();
                            println!("{}", "Conversation cleared".yellow());
                        }
                    }
                    SpecialCommand::Copy(n) => match session.messages().get(n - 1) {
                        Some(message) => println!("{}", message.text()),
                        None => eprintln!("{}", format!("No message {n}").red()),
                    },
                    SpecialCommand::Edit { index, text } => {
                        let id = session.messages().get(index - 1).map(|m| m.id);
                        match id {
                            Some(id) => {
                                let result = run_turn(&mut session, |s| {
                                    Box::pin(
                                        async move { s.edit_and_resend(id, text, render_event).await },
                                    )
                                })
                                .await;
                                report(result);
                            }
                            None => eprintln!("{}", format!("No message {index}").red()),
                        }
                    }
                    SpecialCommand::Regen => {
                        let result = run_turn(&mut session, |s| {
                            Box::pin(async move { s.regenerate(None, render_event).await })
                        })
                        .await;
                        report(result);
                    }
                    SpecialCommand::Attach(path) => match Attachment::from_path(&path) {
                        Ok(attachment) => {
                            println!(
                                "{}",
                                format!(
                                    "Staged {} ({})",
                                    attachment.filename, attachment.media_type
                                )
                                .green()
                            );
                            pending.push(attachment);
                        }
                        // Validation failures name the file; the session is untouched.
                        Err(err) => eprintln!("{}", format!("{err}").red()),
                    },
                    SpecialCommand::Detach => {
                        pending.clear();
                        println!("{}", "Attachments dropped".yellow());
                    }
                    SpecialCommand::Quit => break,
                    SpecialCommand::None => {
                        let input =
                            UserInput::with_attachments(trimmed, std::mem::take(&mut pending));
                        let result = run_turn(&mut session, |s| {
                            Box::pin(async move { s.send(input, render_event).await })
                        })
                        .await;
                        report(result);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

type TurnFuture<'a> = std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<crate::session::TurnOutcome>> + 'a>,
>;

/// Run one turn with a Ctrl-C watcher armed.
///
/// The watcher cancels the in-flight turn via a [`crate::session::StopHandle`]
/// cloned before the turn starts; it is aborted as soon as the turn ends so
/// a later Ctrl-C falls through to the readline loop.
async fn run_turn<'a, F>(
    session: &'a mut ChatSession,
    turn: F,
) -> Result<crate::session::TurnOutcome>
where
    F: FnOnce(&'a mut ChatSession) -> TurnFuture<'a>,
{
    let handle = session.stop_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });
    let result = turn(session).await;
    watcher.abort();
    result
}

/// Render one streamed event to the terminal
fn render_event(event: &DeltaEvent) {
    match event {
        DeltaEvent::TextDelta(delta) => {
            print!("{delta}");
            let _ = std::io::stdout().flush();
        }
        DeltaEvent::File {
            filename,
            media_type,
            ..
        } => {
            println!("\n{}", format!("[file: {filename} ({media_type})]").cyan());
        }
        DeltaEvent::Done | DeltaEvent::Error(_) => {}
    }
}

fn report(result: Result<crate::session::TurnOutcome>) {
    use crate::session::TurnOutcome;
    match result {
        Ok(TurnOutcome::Completed) => println!("\n"),
        Ok(TurnOutcome::Stopped) => println!("\n{}\n", "[stopped]".yellow()),
        Ok(TurnOutcome::Failed(reason)) => {
            eprintln!("\n{}\n", format!("Error: {reason}").red())
        }
        Err(err) => eprintln!("{}\n", format!("Error: {err}").red()),
    }
}

fn format_prompt(status: SessionStatus, pending: usize) -> String {
    let tag = match status {
        SessionStatus::Ready => "ready".green(),
        SessionStatus::Submitted => "waiting".yellow(),
        SessionStatus::Streaming => "streaming".yellow(),
        SessionStatus::Error => "error".red(),
    };
    if pending > 0 {
        format!("[{tag}|{}] > ", format!("{pending} file(s)").cyan())
    } else {
        format!("[{tag}] > ")
    }
}

fn print_status(session: &ChatSession, model: &str, pending: &[Attachment]) {
    println!("Model:       {model}");
    println!("Status:      {:?}", session.status());
    println!("Messages:    {}", session.messages().len());
    if pending.is_empty() {
        println!("Attachments: none");
    } else {
        let names: Vec<&str> = pending.iter().map(|a| a.filename.as_str()).collect();
        println!("Attachments: {}", names.join(", "));
    }
    for (i, message) in session.messages().iter().enumerate() {
        let role = match message.role {
            crate::session::Role::User => "user".cyan(),
            crate::session::Role::Assistant => "assistant".magenta(),
        };
        let mut text = message.text().replace('\n', " ");
        if text.chars().count() > 60 {
            text = text.chars().take(57).collect();
            text.push_str("...");
        }
        println!("  {} {} {}", i + 1, role, text);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shows_status_and_pending() {
        let ready = format_prompt(SessionStatus::Ready, 0);
        assert!(ready.contains("ready"));
        let with_files = format_prompt(SessionStatus::Ready, 2);
        assert!(with_files.contains("2 file(s)"));
        let error = format_prompt(SessionStatus::Error, 0);
        assert!(error.contains("error"));
    }
}
