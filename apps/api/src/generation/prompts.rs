// LLM prompt text for program generation.
// The system instruction comes from llm_client::prompts::JSON_ONLY_SYSTEM.

/// Program generation prompt template.
/// Replace: {experience_level}, {frequency}, {goals}, {profile_details}, {template},
///          {session_count}, {session_names}, {session_list}, {first_session},
///          {exercise_catalog}
pub const PROGRAM_PROMPT_TEMPLATE: &str = r#"You are an expert strength coach.
The user has a "{experience_level}" profile and trains {frequency} times per week.
Goals: {goals}.{profile_details}

Build a "{template}" training program with 4 to 5 exercises per session.

REQUIRED STRUCTURE:
The program MUST contain exactly {session_count} sessions, in this exact order: {session_names}.
Use these session names verbatim, one JSON session per line below, in this order:
{session_list}

Return STRICTLY valid JSON (nothing else) with this exact shape:
{
  "template": "{template}",
  "sessions": [
    {
      "name": "{first_session}",
      "exercises": [
        { "id": 2, "sets": 4, "reps": 8 },
        { "id": 14 }
      ]
    }
  ]
}

"sets" and "reps" are optional positive integers. Every exercise object MUST have an "id".

AVAILABLE EXERCISES (ID — NAME):
{exercise_catalog}

HARD RULES:
1. Use ONLY IDs from the list above — never invent an ID
2. "template" MUST be exactly "{template}"
3. Exactly {session_count} sessions, with the names and order given above
4. Return a single JSON object — no text, no explanations, no markdown"#;

/// Appended to the profile summary when the user has both a current and a target weight.
/// Replace: {target}, {current}, {delta}
pub const WEIGHT_GOAL_LINE: &str =
    "\nWeight goal: {target}kg (currently {current}kg, delta: {delta}kg).";

/// Replace: {muscle_groups}
pub const MUSCLE_PRIORITIES_LINE: &str =
    "\nMuscle priorities: {muscle_groups}. INCREASE volume for these muscle groups.";

pub const HOME_ENVIRONMENT_LINE: &str =
    "\nEnvironment: HOME - favor bodyweight exercises and minimal equipment.";

pub const GYM_ENVIRONMENT_LINE: &str = "\nEnvironment: GYM - full equipment access.";

pub const BODY_WEIGHT_ONLY_LINE: &str =
    "\nEquipment: bodyweight exercises only.";
