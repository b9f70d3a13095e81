//! User health profile and derived metrics
//!
//! A profile comes in from a YAML or JSON file, gets its units normalized
//! (cm/kg), and yields derived metrics (BMI, BMI category) plus the goal
//! list that is actually safe for that body composition.

use serde::{Deserialize, Serialize};

use crate::error::{FitsageError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    FatLoss,
    MuscleGain,
    Maintain,
    Recomposition,
    Strength,
    BeginnerFitness,
}

/// All goals, in presentation order
pub const ALL_GOALS: [Goal; 6] = [
    Goal::FatLoss,
    Goal::MuscleGain,
    Goal::Maintain,
    Goal::Recomposition,
    Goal::Strength,
    Goal::BeginnerFitness,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Mixed,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryArea {
    Knee,
    Back,
    Shoulder,
    Neck,
    Ankle,
    Wrist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjurySeverity {
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalCondition {
    None,
    Bp,
    Diabetes,
    Thyroid,
    HeartCondition,
    Asthma,
    Arthritis,
    BackPain,
    DigestiveIssues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Vegetarian,
    NonVegetarian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    None,
    Home,
    Gym,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    Cm,
    Ft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lbs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injury {
    pub area: InjuryArea,
    pub severity: InjurySeverity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
}

/// User health profile as supplied in the input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_value: f64,
    pub height_unit: HeightUnit,
    pub weight_value: f64,
    pub weight_unit: WeightUnit,
    pub experience_level: ExperienceLevel,
    pub primary_goal: Goal,
    pub activity_level: ActivityLevel,
    /// Minutes available per workout
    pub workout_time_min: u32,
    #[serde(default)]
    pub injuries: Vec<Injury>,
    #[serde(default)]
    pub medical_conditions: Vec<MedicalCondition>,
    pub diet_type: DietType,
    pub equipment: Equipment,
    #[serde(default)]
    pub location: Location,
    /// When true, diet options should favor foods local to the location
    #[serde(default)]
    pub country_specific_diet: bool,
    /// Free-form likes/dislikes forwarded to the planner
    #[serde(default)]
    pub preferences: String,
}

/// Derived metrics, normalized to metric units
#[derive(Debug, Clone, Serialize)]
pub struct DerivedMetrics {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
}

/// ft to cm, rounded to a whole centimetre
pub fn convert_height_to_cm(value: f64, unit: HeightUnit) -> f64 {
    match unit {
        HeightUnit::Ft => (value * 30.48).round(),
        HeightUnit::Cm => value,
    }
}

/// lbs to kg, rounded to one decimal
pub fn convert_weight_to_kg(value: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Lbs => (value * 0.453592 * 10.0).round() / 10.0,
        WeightUnit::Kg => value,
    }
}

/// kg / m^2, rounded to one decimal
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    (weight_kg / (height_m * height_m) * 10.0).round() / 10.0
}

pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Goals that are safe to pursue for the given body composition.
///
/// Underweight users lose the fat-loss goal. Obese users lose maintain,
/// and fat-loss moves to the front as the recommended choice. Age is
/// accepted for future rules but currently unused.
pub fn filter_goals(bmi: f64, _age: u32) -> Vec<Goal> {
    let mut goals: Vec<Goal> = ALL_GOALS.to_vec();

    if bmi < 18.5 {
        goals.retain(|g| *g != Goal::FatLoss);
    }

    if bmi > 30.0 {
        goals.retain(|g| *g != Goal::Maintain);
        if let Some(pos) = goals.iter().position(|g| *g == Goal::FatLoss) {
            let fat_loss = goals.remove(pos);
            goals.insert(0, fat_loss);
        }
    }

    goals
}

impl UserProfile {
    /// Load and validate a profile from a YAML or JSON file.
    ///
    /// JSON is valid YAML, so one parser covers both.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let profile: UserProfile = serde_yaml::from_str(&raw)
            .map_err(|e| FitsageError::Profile(format!("failed to parse profile: {e}")))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Metric units, BMI, and BMI category for this profile
    pub fn derive(&self) -> DerivedMetrics {
        let height_cm = convert_height_to_cm(self.height_value, self.height_unit);
        let weight_kg = convert_weight_to_kg(self.weight_value, self.weight_unit);
        let bmi = calculate_bmi(height_cm, weight_kg);
        DerivedMetrics {
            height_cm,
            weight_kg,
            bmi,
            bmi_category: bmi_category(bmi),
        }
    }

    /// Reject profiles with impossible values or an unsafe goal choice.
    ///
    /// # Errors
    ///
    /// Returns `FitsageError::Profile` describing the first failed check.
    pub fn validate(&self) -> Result<()> {
        if self.age < 10 || self.age > 100 {
            return Err(FitsageError::Profile(format!(
                "age {} is out of the supported 10-100 range",
                self.age
            ))
            .into());
        }
        let metrics = self.derive();
        if !(90.0..=250.0).contains(&metrics.height_cm) {
            return Err(FitsageError::Profile(format!(
                "height {}cm is out of the supported range",
                metrics.height_cm
            ))
            .into());
        }
        if !(25.0..=350.0).contains(&metrics.weight_kg) {
            return Err(FitsageError::Profile(format!(
                "weight {}kg is out of the supported range",
                metrics.weight_kg
            ))
            .into());
        }
        if self.workout_time_min < 15 || self.workout_time_min > 180 {
            return Err(FitsageError::Profile(
                "workout time must be between 15 and 180 minutes".to_string(),
            )
            .into());
        }
        let allowed = filter_goals(metrics.bmi, self.age);
        if !allowed.contains(&self.primary_goal) {
            return Err(FitsageError::Profile(format!(
                "goal {:?} is not recommended for BMI {}; allowed: {:?}",
                self.primary_goal, metrics.bmi, allowed
            ))
            .into());
        }
        Ok(())
    }

    /// Serialize the profile plus derived metrics for the planner prompt
    pub fn to_prompt_json(&self) -> Result<String> {
        let metrics = self.derive();
        let value = serde_json::json!({
            "user_profile": {
                "name": self.name,
                "age": self.age,
                "gender": self.gender,
                "height_cm": metrics.height_cm,
                "weight_kg": metrics.weight_kg,
                "bmi": metrics.bmi,
                "bmi_category": metrics.bmi_category,
                "experience_level": self.experience_level,
                "primary_goal": self.primary_goal,
                "activity_level": self.activity_level,
                "workout_time_min": self.workout_time_min,
                "injuries": self.injuries,
                "medical_conditions": self.medical_conditions,
                "location": self.location,
            },
            "constraints": {
                "avoid_high_impact": !self.injuries.is_empty(),
                "diet_should_be_local": self.country_specific_diet,
            },
            "preferences": {
                "diet_type": self.diet_type,
                "equipment_available": self.equipment,
                "user_preferance_description": self.preferences,
            },
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> UserProfile {
        UserProfile {
            name: "Asha".to_string(),
            age: 30,
            gender: Gender::Female,
            height_value: 165.0,
            height_unit: HeightUnit::Cm,
            weight_value: 60.0,
            weight_unit: WeightUnit::Kg,
            experience_level: ExperienceLevel::Beginner,
            primary_goal: Goal::Recomposition,
            activity_level: ActivityLevel::Mixed,
            workout_time_min: 45,
            injuries: vec![],
            medical_conditions: vec![],
            diet_type: DietType::Vegetarian,
            equipment: Equipment::Home,
            location: Location {
                country: "India".to_string(),
                state: "Kerala".to_string(),
            },
            country_specific_diet: true,
            preferences: String::new(),
        }
    }

    #[test]
    fn test_height_conversion() {
        assert_eq!(convert_height_to_cm(5.5, HeightUnit::Ft), 168.0);
        assert_eq!(convert_height_to_cm(170.0, HeightUnit::Cm), 170.0);
    }

    #[test]
    fn test_weight_conversion() {
        assert_eq!(convert_weight_to_kg(150.0, WeightUnit::Lbs), 68.0);
        assert_eq!(convert_weight_to_kg(132.0, WeightUnit::Lbs), 59.9);
        assert_eq!(convert_weight_to_kg(70.0, WeightUnit::Kg), 70.0);
    }

    #[test]
    fn test_bmi_calculation() {
        assert_eq!(calculate_bmi(165.0, 60.0), 22.0);
        assert_eq!(calculate_bmi(180.0, 95.0), 29.3);
    }

    #[test]
    fn test_bmi_categories() {
        assert_eq!(bmi_category(17.0), BmiCategory::Underweight);
        assert_eq!(bmi_category(18.5), BmiCategory::Normal);
        assert_eq!(bmi_category(24.9), BmiCategory::Normal);
        assert_eq!(bmi_category(25.0), BmiCategory::Overweight);
        assert_eq!(bmi_category(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_goal_filter_underweight_hides_fat_loss() {
        let goals = filter_goals(17.5, 25);
        assert!(!goals.contains(&Goal::FatLoss));
        assert!(goals.contains(&Goal::MuscleGain));
    }

    #[test]
    fn test_goal_filter_obese_promotes_fat_loss() {
        let goals = filter_goals(32.0, 40);
        assert_eq!(goals[0], Goal::FatLoss);
        assert!(!goals.contains(&Goal::Maintain));
    }

    #[test]
    fn test_goal_filter_normal_keeps_all() {
        assert_eq!(filter_goals(22.0, 30).len(), ALL_GOALS.len());
    }

    #[test]
    fn test_derive_normalizes_units() {
        let mut profile = sample_profile();
        profile.height_value = 5.5;
        profile.height_unit = HeightUnit::Ft;
        profile.weight_value = 150.0;
        profile.weight_unit = WeightUnit::Lbs;

        let metrics = profile.derive();
        assert_eq!(metrics.height_cm, 168.0);
        assert_eq!(metrics.weight_kg, 68.0);
        assert_eq!(metrics.bmi, 24.1);
        assert_eq!(metrics.bmi_category, BmiCategory::Normal);
    }

    #[test]
    fn test_validate_accepts_sample() {
        sample_profile().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_unsafe_goal() {
        let mut profile = sample_profile();
        profile.weight_value = 45.0; // BMI 16.5: underweight
        profile.primary_goal = Goal::FatLoss;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_absurd_age() {
        let mut profile = sample_profile();
        profile.age = 7;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_profile_parses_from_yaml() {
        let yaml = r#"
name: Ravi
age: 42
gender: male
height_value: 5.9
height_unit: ft
weight_value: 190
weight_unit: lbs
experience_level: intermediate
primary_goal: fat_loss
activity_level: sedentary
workout_time_min: 30
injuries:
  - area: knee
    severity: mild
medical_conditions: [bp]
diet_type: non_vegetarian
equipment: gym
"#;
        let profile: UserProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.primary_goal, Goal::FatLoss);
        assert_eq!(profile.injuries[0].area, InjuryArea::Knee);
        assert_eq!(profile.medical_conditions[0], MedicalCondition::Bp);
        profile.validate().unwrap();
    }

    #[test]
    fn test_prompt_json_contains_derived_fields() {
        let json = sample_profile().to_prompt_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["user_profile"]["bmi"], 22.0);
        assert_eq!(value["user_profile"]["bmi_category"], "normal");
        assert_eq!(value["constraints"]["diet_should_be_local"], true);
    }
}
