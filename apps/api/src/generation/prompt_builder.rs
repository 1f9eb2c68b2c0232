//! Prompt Builder — renders the single natural-language request sent to the LLM.
//!
//! The session layout is stated twice (prose and numbered list) and the eligible
//! catalog is embedded in full as `id — name` lines.
//!
//! Placeholders are filled in a single pass over the template, so substituted
//! text (goal labels, muscle group names) is never expanded again.

use crate::generation::prompts::{
    BODY_WEIGHT_ONLY_LINE, GYM_ENVIRONMENT_LINE, HOME_ENVIRONMENT_LINE, MUSCLE_PRIORITIES_LINE,
    PROGRAM_PROMPT_TEMPLATE, WEIGHT_GOAL_LINE,
};
use crate::models::exercise::{Exercise, MuscleGroupRef};
use crate::models::profile::{FitnessProfile, TrainingEnvironment};
use crate::models::program::ProgramTemplate;

pub fn build_program_prompt(
    profile: &FitnessProfile,
    template: ProgramTemplate,
    exercises: &[Exercise],
    priority_groups: &[MuscleGroupRef],
    session_structure: &[String],
) -> String {
    let goals = if profile.goals.is_empty() {
        "not specified".to_string()
    } else {
        profile.goals.join(", ")
    };

    let session_list = session_structure
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n");

    let exercise_catalog = exercises
        .iter()
        .map(|e| format!("{} — {}", e.id, e.name))
        .collect::<Vec<_>>()
        .join("\n");

    let frequency = profile.clamped_frequency().to_string();
    let details = profile_details(profile, priority_groups);
    let session_count = session_structure.len().to_string();
    let session_names = session_structure.join(", ");
    let first_session = session_structure
        .first()
        .map(String::as_str)
        .unwrap_or("Full Body");

    render(
        PROGRAM_PROMPT_TEMPLATE,
        &[
            ("experience_level", profile.experience_level.as_str()),
            ("frequency", frequency.as_str()),
            ("goals", goals.as_str()),
            ("profile_details", details.as_str()),
            ("template", template.as_str()),
            ("session_count", session_count.as_str()),
            ("session_names", session_names.as_str()),
            ("session_list", session_list.as_str()),
            ("first_session", first_session),
            ("exercise_catalog", exercise_catalog.as_str()),
        ],
    )
}

/// Replaces every `{key}` in `template` with its value in one left-to-right pass.
/// Braces that do not enclose a known key are copied through unchanged.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let substitution = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, end))
        });

        match substitution {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Optional profile lines: weight goal, muscle priorities, environment and equipment.
fn profile_details(profile: &FitnessProfile, priority_groups: &[MuscleGroupRef]) -> String {
    let mut details = String::new();

    if let (Some(current), Some(target), Some(delta)) =
        (profile.weight, profile.target_weight, profile.weight_delta())
    {
        details.push_str(&render(
            WEIGHT_GOAL_LINE,
            &[
                ("target", target.to_string().as_str()),
                ("current", current.to_string().as_str()),
                ("delta", format!("{delta:.1}").as_str()),
            ],
        ));
    }

    if !priority_groups.is_empty() {
        let names = priority_groups
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        details.push_str(&render(MUSCLE_PRIORITIES_LINE, &[("muscle_groups", names.as_str())]));
    }

    match profile.training_environment {
        Some(TrainingEnvironment::Home) => details.push_str(HOME_ENVIRONMENT_LINE),
        Some(TrainingEnvironment::Gym) => details.push_str(GYM_ENVIRONMENT_LINE),
        None => {}
    }

    if profile.body_weight_only {
        details.push_str(BODY_WEIGHT_ONLY_LINE);
    }

    details
}
