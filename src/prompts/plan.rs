//! Fitness-plan generation and revision prompts

/// Shared rule block for plan generation and revision.
const PLAN_CONTEXT: &str = r#"You are a fitness and nutrition planning engine.
Your task:
Analyze the provided User Health Info (JSON or text) and generate a safe, realistic fitness plan strictly in JSON format.

GLOBAL RULES:
- Return ONLY valid JSON
- Follow the provided JSON schema exactly
- Do NOT include markdown, comments, or explanations outside JSON
- Use realistic food quantities, calories, and macros
- Respect age, BMI, injuries, medical conditions, activity level, and user preferences
- AI decides training days, rest days, and light activity days
- Diet and workout sections must be user-editable
- Never give medical advice or claims of curing diseases

DIET RULES:
- Each meal (breakfast, lunch, snack, dinner) must contain EXACTLY 4 - 5 options
- Each option must include:
  - quantity
  - calories
  - macros
  - description (practical, non-medical)
- If diet_should_be_local = true:
  - Use foods commonly eaten in the selected country and state
  - Do NOT make all options traditional dishes
  - Per meal:
    - 2-3 options may be regional/state-specific
    - 1-2 options must be commonly consumed across the state (non-traditional, everyday foods)
- Avoid repeating the same traditional dishes across multiple meals
- If the user provided food preferences or dislikes, prioritize them
- Adjust food choices to SUPPORT the user's health conditions and injuries:
  - Focus on digestion-friendly, recovery-supporting, and inflammation-conscious foods
  - Clearly mention foods or cooking methods to avoid (e.g., excess oil, deep-fried, packaged foods)
- Do NOT claim that any food cures medical conditions

WORKOUT RULES:
- Design workouts based on:
  - age
  - injuries
  - medical conditions
  - experience level
  - time available
- If the user has multiple injuries or medical conditions:
  - Reduce workout intensity
  - Prefer low-impact, controlled movements
  - Avoid high-risk or high-impact exercises
- Add warmup exercises before workout and cooldown exercises after workout
- If the user goal is intense (e.g., muscle gain) BUT health risk exists:
  - Prioritize safety over intensity
  - Provide conservative volume
  - Include 1-2 safer alternative exercises for each main exercise
- Light activity days must focus on mobility, recovery, or conditioning
- Never include unsafe exercises for the given injury profile
- On rest days, do light stretching or mobility exercises
- workout_plan object matches correctly with the training_structure - days_per_week, rest_days, light_activity_days

OUTPUT RULES:
- JSON only
- Values must be consistent across calculations, diet, and workouts
- Explanations inside JSON must be short, practical, and non-medical
- If any required field is unknown, infer a reasonable value instead of omitting it. Never omit required fields."#;

/// Compact description of the expected plan JSON, embedded in both prompts.
const PLAN_FORMAT: &str = r#"Respond with a single JSON object with this shape:
{
  "plan_metadata": { "plan_type": "initial_plan", "goal": string, "duration_weeks": 2, "advise": string (1-3 lines) },
  "calculations": { "bmr": number, "tdee": number, "target_calories": number, "strategy": "deficit" | "maintenance" | "surplus" },
  "training_structure": { "days_per_week": number, "rest_days": number, "light_activity_days": number, "reason": string },
  "diet_plan": {
    "calories_per_day": number,
    "macros": { "protein_g": number, "carbs_g": number, "fat_g": number },
    "meals": {
      "breakfast" | "lunch" | "snack" | "dinner": {
        "options": [4 to 5 of {
          "label": string,
          "quantity": [ { "item": string, "amount": string (e.g. "2 pieces", "150g") } ],
          "calories": number,
          "macros": { "protein_g": number, "carbs_g": number, "fat_g": number },
          "description": string
        }]
      }
    }
  },
  "workout_plan": {
    "weekly_schedule": [exactly 7 of {
      "day": string, "type": "strength" | "light" | "rest", "focus": string,
      "duration_min": number,
      "exercises": [ { "name": string, "sets": number?, "reps": number?, "alternatives": [1 to 2 strings] } ]
    }],
    "injury_considerations": [string],
    "allow_exercise_replacement": true
  },
  "safety_notes": { "medical_conditions_considered": [string], "high_impact_exercises_removed": boolean },
  "explanations": { "diet": string, "workout": string }
}"#;

/// Build the initial plan-generation prompt from a serialized profile.
pub fn plan_prompt(profile_json: &str) -> String {
    format!("{PLAN_CONTEXT}\n\nUser Health Info:\n{profile_json}\n\nOutput Format:\n{PLAN_FORMAT}\n")
}

/// Build the revision prompt: the prior plan plus the user's review.
///
/// Reviews only touch the meal and workout sections; everything else must
/// stay consistent with the original rules and schema.
pub fn plan_revision_prompt(profile_json: &str, prior_plan_json: &str, review: &str) -> String {
    format!(
        r#"{PLAN_CONTEXT}

User Review:
- Read user review and consider context and user health info and change what the user asked for, and make sure you stick to schema and rules.
- The user gives reviews only on the meal and workout plan.

User Health Info:
{profile_json}

Current Plan:
{prior_plan_json}

Review:
{review}

Output Format:
{PLAN_FORMAT}
"#
    )
}
