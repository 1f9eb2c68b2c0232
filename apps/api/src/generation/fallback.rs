//! Fallback Generator — builds a program from the catalog alone, with no LLM.
//!
//! Used once LLM generation is exhausted. Always returns the requested session
//! layout; a session whose muscle groups have no catalog match is emitted empty.
//! Candidate order comes from the caller's RNG, so output varies between calls
//! unless the RNG is seeded.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::generation::template::{FULL_BODY, LEGS, LOWER, PULL, PUSH, UPPER};
use crate::models::exercise::Exercise;
use crate::models::profile::{ExperienceLevel, FitnessProfile};
use crate::models::program::{ExerciseAssignment, GeneratedProgram, ProgramTemplate, Session};

const SINGLE_FOCUS_EXERCISES: usize = 5;
const FULL_BODY_EXERCISES: usize = 6;

const PUSH_GROUPS: &[&str] = &["chest", "shoulders", "triceps"];
const PULL_GROUPS: &[&str] = &["back", "biceps"];
const LOWER_GROUPS: &[&str] = &["quads", "hamstrings", "glutes", "calves"];
const UPPER_GROUPS: &[&str] = &["chest", "back", "shoulders", "biceps", "triceps"];
const ALL_GROUPS: &[&str] = &[
    "chest",
    "shoulders",
    "triceps",
    "back",
    "biceps",
    "quads",
    "hamstrings",
    "glutes",
    "calves",
];

/// Which muscle groups a session trains, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFocus {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    FullBody,
}

impl SessionFocus {
    /// Unrecognised names train everything.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        [
            (PUSH, SessionFocus::Push),
            (PULL, SessionFocus::Pull),
            (LEGS, SessionFocus::Legs),
            (UPPER, SessionFocus::Upper),
            (LOWER, SessionFocus::Lower),
            (FULL_BODY, SessionFocus::FullBody),
        ]
        .into_iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(name))
        .map(|(_, focus)| focus)
        .unwrap_or(SessionFocus::FullBody)
    }

    pub fn muscle_groups(&self) -> &'static [&'static str] {
        match self {
            SessionFocus::Push => PUSH_GROUPS,
            SessionFocus::Pull => PULL_GROUPS,
            SessionFocus::Legs | SessionFocus::Lower => LOWER_GROUPS,
            SessionFocus::Upper => UPPER_GROUPS,
            SessionFocus::FullBody => ALL_GROUPS,
        }
    }

    pub fn exercise_count(&self) -> usize {
        match self {
            SessionFocus::FullBody => FULL_BODY_EXERCISES,
            _ => SINGLE_FOCUS_EXERCISES,
        }
    }
}

/// Sets and reps by experience level. Upper-body work gets fewer reps than lower-body work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prescription {
    pub sets: u32,
    pub upper_reps: u32,
    pub lower_reps: u32,
}

impl Prescription {
    pub fn for_level(level: ExperienceLevel) -> Self {
        match level {
            ExperienceLevel::Beginner => Self {
                sets: 3,
                upper_reps: 12,
                lower_reps: 15,
            },
            ExperienceLevel::Intermediate => Self {
                sets: 3,
                upper_reps: 10,
                lower_reps: 12,
            },
            ExperienceLevel::Advanced => Self {
                sets: 4,
                upper_reps: 8,
                lower_reps: 10,
            },
        }
    }

    fn assign(&self, exercise: &Exercise) -> ExerciseAssignment {
        let reps = if exercise.targets_any(UPPER_GROUPS) {
            self.upper_reps
        } else {
            self.lower_reps
        };
        ExerciseAssignment {
            exercise_id: exercise.id,
            sets: self.sets,
            reps,
        }
    }
}

/// Assembles a program for `session_structure` from `exercises`, which the caller
/// has already filtered by difficulty and equipment.
pub fn generate_fallback<R: Rng + ?Sized>(
    profile: &FitnessProfile,
    template: ProgramTemplate,
    session_structure: &[String],
    exercises: &[Exercise],
    rng: &mut R,
) -> GeneratedProgram {
    let prescription = Prescription::for_level(profile.experience_level);

    let sessions = session_structure
        .iter()
        .map(|name| {
            let focus = SessionFocus::from_name(name);
            let mut candidates: Vec<&Exercise> = exercises
                .iter()
                .filter(|e| e.targets_any(focus.muscle_groups()))
                .collect();

            if candidates.is_empty() {
                warn!("Fallback: no catalog exercises match session '{name}', emitting it empty");
            }

            candidates.shuffle(rng);
            let exercises = candidates
                .into_iter()
                .take(focus.exercise_count())
                .map(|e| prescription.assign(e))
                .collect();

            Session {
                name: name.clone(),
                exercises,
            }
        })
        .collect();

    GeneratedProgram { template, sessions }
}
