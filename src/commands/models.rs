//! Model registry command handlers

use colored::Colorize;
use prettytable::{row, Table};

use crate::config::Config;
use crate::error::Result;

/// List the models available in the registry
pub fn list_models(config: &Config) -> Result<()> {
    let mut table = Table::new();
    table.add_row(row!["Model", "Role"]);

    for model in &config.provider.models {
        let mut roles: Vec<&str> = Vec::new();
        if *model == config.provider.chat_model {
            roles.push("chat");
        }
        if *model == config.provider.plan_model {
            roles.push("plan");
        }
        let role = if roles.is_empty() {
            "-".to_string()
        } else {
            roles.join(", ")
        };
        table.add_row(row![model, role]);
    }

    // The plan model may live outside the registry (different provider).
    if !config.provider.models.contains(&config.provider.plan_model) {
        table.add_row(row![config.provider.plan_model, "plan"]);
    }

    println!("\nAvailable models:\n");
    table.printstd();
    println!();
    Ok(())
}

/// Show the currently active models
pub fn current_models(config: &Config) -> Result<()> {
    println!("Chat model: {}", config.provider.chat_model.cyan());
    println!("Plan model: {}", config.provider.plan_model.cyan());
    Ok(())
}
