//! Fitsage - Streaming AI chat assistant CLI
//!
#![doc = "Main entry point for the Fitsage application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fitsage::cli::{Cli, Commands, ModelCommand};
use fitsage::commands;
use fitsage::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load and validate configuration
    let config = Config::load(&cli.config)?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { model, system } => {
            commands::chat::run_chat(config, model, system).await?;
            Ok(())
        }
        Commands::Summarize { text, file, json } => {
            commands::summarize::run_summarize(config, text, file, json).await?;
            Ok(())
        }
        Commands::Plan {
            profile,
            output,
            revise,
            plan_file,
            json,
        } => {
            commands::plan::run_plan(config, profile, output, revise, plan_file, json).await?;
            Ok(())
        }
        Commands::Models { command } => match command {
            ModelCommand::List => {
                commands::models::list_models(&config)?;
                Ok(())
            }
            ModelCommand::Current => {
                commands::models::current_models(&config)?;
                Ok(())
            }
        },
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "fitsage=debug" } else { "fitsage=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
