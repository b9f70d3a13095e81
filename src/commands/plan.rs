//! Fitness-plan command handler
//!
//! Loads and validates the health profile, builds the generation (or
//! revision) prompt, runs it through the plan transport, and renders the
//! schema-validated result as tables or JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use prettytable::{row, Table};
use tracing::info;

use crate::config::Config;
use crate::error::{FitsageError, Result};
use crate::plan::schema::{DayType, FitnessPlan};
use crate::plan::{parse_plan_json, UserProfile};
use crate::prompts::{plan_prompt, plan_revision_prompt};

/// Generate or revise a fitness plan
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `profile_path` - Path to the health profile (YAML or JSON)
/// * `output` - Optional path to write the plan JSON to
/// * `revise` - Review text; switches to revision mode
/// * `plan_file` - Existing plan to revise (required with `revise`)
/// * `json` - Print raw JSON instead of tables
///
/// # Errors
///
/// Returns an error when the profile fails validation, the provider call
/// fails, or the response violates the plan schema.
pub async fn run_plan(
    config: Config,
    profile_path: PathBuf,
    output: Option<PathBuf>,
    revise: Option<String>,
    plan_file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let profile = UserProfile::load(&profile_path)?;
    let metrics = profile.derive();
    info!(
        bmi = metrics.bmi,
        category = ?metrics.bmi_category,
        goal = ?profile.primary_goal,
        "profile validated"
    );
    eprintln!(
        "{}",
        format!(
            "Profile ok: BMI {} ({:?}), goal {:?}",
            metrics.bmi, metrics.bmi_category, profile.primary_goal
        )
        .green()
    );

    let profile_json = profile.to_prompt_json()?;
    let prompt = match revise {
        Some(review) => {
            let plan_path = plan_file.ok_or_else(|| {
                FitsageError::Config("--revise requires --plan-file".to_string())
            })?;
            let prior = std::fs::read_to_string(&plan_path)?;
            // Re-validate so we never ask for a revision of a broken plan.
            parse_plan_json(&prior)?;
            eprintln!("{}", "Revising plan...".cyan());
            plan_revision_prompt(&profile_json, &prior, &review)
        }
        None => {
            eprintln!("{}", "Generating plan...".cyan());
            plan_prompt(&profile_json)
        }
    };

    let transport = Arc::new(super::build_plan_transport(&config)?);
    let raw = super::one_shot(transport, prompt).await?;
    let plan = parse_plan_json(&raw)?;

    if let Some(path) = &output {
        write_plan(path, &plan)?;
        eprintln!("{}", format!("Plan written to {}", path.display()).green());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn write_plan(path: &Path, plan: &FitnessPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Render the plan as terminal tables
fn print_plan(plan: &FitnessPlan) {
    println!("\n{}", plan.plan_metadata.goal.bold());
    println!("{}\n", plan.plan_metadata.advise);

    let mut table = Table::new();
    table.add_row(row!["BMR", "TDEE", "Target Calories", "Strategy"]);
    table.add_row(row![
        format!("{:.0}", plan.calculations.bmr),
        format!("{:.0}", plan.calculations.tdee),
        format!("{:.0}", plan.calculations.target_calories),
        format!("{:?}", plan.calculations.strategy).to_lowercase()
    ]);
    println!("Calculations:");
    table.printstd();

    let mut table = Table::new();
    table.add_row(row!["Meal", "Options", "Calories (first option)"]);
    let meals = [
        ("Breakfast", &plan.diet_plan.meals.breakfast),
        ("Lunch", &plan.diet_plan.meals.lunch),
        ("Snack", &plan.diet_plan.meals.snack),
        ("Dinner", &plan.diet_plan.meals.dinner),
    ];
    for (name, meal) in meals {
        let labels: Vec<&str> = meal.options.iter().map(|o| o.label.as_str()).collect();
        let first_calories = meal
            .options
            .first()
            .map(|o| format!("{:.0}", o.calories))
            .unwrap_or_default();
        table.add_row(row![name, labels.join(", "), first_calories]);
    }
    println!(
        "\nDiet ({:.0} kcal/day, {:.0}g protein):",
        plan.diet_plan.calories_per_day, plan.diet_plan.macros.protein_g
    );
    table.printstd();

    let mut table = Table::new();
    table.add_row(row!["Day", "Type", "Focus", "Minutes", "Exercises"]);
    for day in &plan.workout_plan.weekly_schedule {
        let day_type = match day.day_type {
            DayType::Strength => "strength",
            DayType::Light => "light",
            DayType::Rest => "rest",
        };
        let exercises: Vec<&str> = day.exercises.iter().map(|e| e.name.as_str()).collect();
        table.add_row(row![
            day.day,
            day_type,
            day.focus,
            format!("{:.0}", day.duration_min),
            exercises.join(", ")
        ]);
    }
    println!("\nWeekly schedule:");
    table.printstd();

    if !plan.workout_plan.injury_considerations.is_empty() {
        println!("\nInjury considerations:");
        for note in &plan.workout_plan.injury_considerations {
            println!("  - {note}");
        }
    }
    println!("\nWhy this diet: {}", plan.explanations.diet);
    println!("Why this workout: {}\n", plan.explanations.workout);
}
