//! Fitness-plan generation: user profile intake, derived metrics, and the
//! schema-validated plan returned by the provider.

pub mod profile;
pub mod schema;

pub use profile::{
    bmi_category, calculate_bmi, convert_height_to_cm, convert_weight_to_kg, filter_goals,
    BmiCategory, DerivedMetrics, Goal, UserProfile,
};
pub use schema::{parse_plan_json, FitnessPlan};
