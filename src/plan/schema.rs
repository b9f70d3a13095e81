//! Fitness plan schema
//!
//! Serde mirror of the plan JSON the provider is asked to produce, plus
//! the cardinality checks that the prompt promises: a full 7-day schedule,
//! 4-5 options per meal, and 1-2 alternatives per exercise.

use serde::{Deserialize, Serialize};

use crate::error::{FitsageError, Result};
use crate::structured::parse_structured;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Deficit,
    Maintenance,
    Surplus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Strength,
    Light,
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityItem {
    pub item: String,
    /// Quantity with unit, e.g. "2 pieces", "150g", "1 tbsp"
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietOption {
    pub label: String,
    pub quantity: Vec<QuantityItem>,
    pub calories: f64,
    pub macros: Macros,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub options: Vec<DietOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub snack: Meal,
    pub dinner: Meal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietPlan {
    pub calories_per_day: f64,
    pub macros: Macros,
    pub meals: Meals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    #[serde(rename = "type")]
    pub day_type: DayType,
    pub focus: String,
    pub duration_min: f64,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub plan_type: String,
    pub goal: String,
    pub duration_weeks: u32,
    pub advise: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calculations {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingStructure {
    pub days_per_week: u32,
    pub rest_days: u32,
    pub light_activity_days: u32,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub weekly_schedule: Vec<WorkoutDay>,
    pub injury_considerations: Vec<String>,
    pub allow_exercise_replacement: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyNotes {
    pub medical_conditions_considered: Vec<String>,
    pub high_impact_exercises_removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanations {
    pub diet: String,
    pub workout: String,
}

/// A complete generated fitness plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessPlan {
    pub plan_metadata: PlanMetadata,
    pub calculations: Calculations,
    pub training_structure: TrainingStructure,
    pub diet_plan: DietPlan,
    pub workout_plan: WorkoutPlan,
    pub safety_notes: SafetyNotes,
    pub explanations: Explanations,
}

impl FitnessPlan {
    /// Enforce the cardinality rules the schema promises.
    ///
    /// # Errors
    ///
    /// Returns `FitsageError::Structured` describing the first violated
    /// rule.
    pub fn validate(&self) -> Result<()> {
        let schedule = &self.workout_plan.weekly_schedule;
        if schedule.len() != 7 {
            return Err(FitsageError::Structured(format!(
                "weekly_schedule has {} days, expected 7",
                schedule.len()
            ))
            .into());
        }

        let day_total = self.training_structure.days_per_week
            + self.training_structure.rest_days
            + self.training_structure.light_activity_days;
        if day_total != 7 {
            return Err(FitsageError::Structured(format!(
                "training_structure days sum to {day_total}, expected 7"
            ))
            .into());
        }

        let meals = [
            ("breakfast", &self.diet_plan.meals.breakfast),
            ("lunch", &self.diet_plan.meals.lunch),
            ("snack", &self.diet_plan.meals.snack),
            ("dinner", &self.diet_plan.meals.dinner),
        ];
        for (name, meal) in meals {
            let count = meal.options.len();
            if !(4..=5).contains(&count) {
                return Err(FitsageError::Structured(format!(
                    "{name} has {count} options, expected 4 to 5"
                ))
                .into());
            }
            for option in &meal.options {
                if option.quantity.is_empty() {
                    return Err(FitsageError::Structured(format!(
                        "diet option '{}' has an empty quantity list",
                        option.label
                    ))
                    .into());
                }
            }
        }

        for day in schedule {
            for exercise in &day.exercises {
                let alts = exercise.alternatives.len();
                if !(1..=2).contains(&alts) {
                    return Err(FitsageError::Structured(format!(
                        "exercise '{}' has {alts} alternatives, expected 1 to 2",
                        exercise.name
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }
}

/// Parse and validate a plan from raw model output
pub fn parse_plan_json(raw: &str) -> Result<FitnessPlan> {
    let plan: FitnessPlan = parse_structured(raw)?;
    plan.validate()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_option(label: &str) -> DietOption {
        DietOption {
            label: label.to_string(),
            quantity: vec![QuantityItem {
                item: "oats".to_string(),
                amount: "60g".to_string(),
            }],
            calories: 250.0,
            macros: Macros {
                protein_g: 10.0,
                carbs_g: 40.0,
                fat_g: 5.0,
            },
            description: "simple and filling".to_string(),
        }
    }

    fn sample_meal(options: usize) -> Meal {
        Meal {
            options: (0..options).map(|i| sample_option(&format!("option {i}"))).collect(),
        }
    }

    fn sample_day(day: &str, day_type: DayType) -> WorkoutDay {
        WorkoutDay {
            day: day.to_string(),
            day_type,
            focus: "full body".to_string(),
            duration_min: 45.0,
            exercises: vec![Exercise {
                name: "squat".to_string(),
                sets: Some(3),
                reps: Some(10),
                alternatives: vec!["leg press".to_string()],
            }],
        }
    }

    fn sample_plan() -> FitnessPlan {
        FitnessPlan {
            plan_metadata: PlanMetadata {
                plan_type: "initial_plan".to_string(),
                goal: "fat_loss".to_string(),
                duration_weeks: 2,
                advise: "start slow".to_string(),
            },
            calculations: Calculations {
                bmr: 1500.0,
                tdee: 2100.0,
                target_calories: 1800.0,
                strategy: Strategy::Deficit,
            },
            training_structure: TrainingStructure {
                days_per_week: 4,
                rest_days: 2,
                light_activity_days: 1,
                reason: "beginner volume".to_string(),
            },
            diet_plan: DietPlan {
                calories_per_day: 1800.0,
                macros: Macros {
                    protein_g: 120.0,
                    carbs_g: 180.0,
                    fat_g: 60.0,
                },
                meals: Meals {
                    breakfast: sample_meal(4),
                    lunch: sample_meal(5),
                    snack: sample_meal(4),
                    dinner: sample_meal(4),
                },
            },
            workout_plan: WorkoutPlan {
                weekly_schedule: vec![
                    sample_day("Monday", DayType::Strength),
                    sample_day("Tuesday", DayType::Strength),
                    sample_day("Wednesday", DayType::Rest),
                    sample_day("Thursday", DayType::Strength),
                    sample_day("Friday", DayType::Strength),
                    sample_day("Saturday", DayType::Light),
                    sample_day("Sunday", DayType::Rest),
                ],
                injury_considerations: vec![],
                allow_exercise_replacement: true,
            },
            safety_notes: SafetyNotes {
                medical_conditions_considered: vec![],
                high_impact_exercises_removed: false,
            },
            explanations: Explanations {
                diet: "balanced deficit".to_string(),
                workout: "progressive overload".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_plan_passes() {
        sample_plan().validate().unwrap();
    }

    #[test]
    fn test_short_schedule_rejected() {
        let mut plan = sample_plan();
        plan.workout_plan.weekly_schedule.pop();
        let err = plan.validate().unwrap_err();
        assert!(err.to_string().contains("expected 7"));
    }

    #[test]
    fn test_wrong_day_split_rejected() {
        let mut plan = sample_plan();
        plan.training_structure.rest_days = 4;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_too_few_meal_options_rejected() {
        let mut plan = sample_plan();
        plan.diet_plan.meals.lunch = sample_meal(2);
        let err = plan.validate().unwrap_err();
        assert!(err.to_string().contains("lunch"));
    }

    #[test]
    fn test_too_many_alternatives_rejected() {
        let mut plan = sample_plan();
        plan.workout_plan.weekly_schedule[0].exercises[0].alternatives = vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ];
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_day_type_wire_name() {
        let day = sample_day("Monday", DayType::Strength);
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["type"], "strength");
    }

    #[test]
    fn test_parse_plan_json_roundtrip() {
        let json = serde_json::to_string(&sample_plan()).unwrap();
        let fenced = format!("```json\n{json}\n```");
        let plan = parse_plan_json(&fenced).unwrap();
        assert_eq!(plan.calculations.strategy, Strategy::Deficit);
    }

    #[test]
    fn test_parse_plan_json_rejects_invalid_cardinality() {
        let mut plan = sample_plan();
        plan.diet_plan.meals.snack = sample_meal(1);
        let json = serde_json::to_string(&plan).unwrap();
        assert!(parse_plan_json(&json).is_err());
    }
}
