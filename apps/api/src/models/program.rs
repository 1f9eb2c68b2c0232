use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Weekly split patterns a program can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgramTemplate {
    FullBody,
    UpperLower,
    PushPullLegs,
    PplUpperLower,
    PplX2,
    PplX2FullBody,
    Custom,
}

impl ProgramTemplate {
    pub const ALL: [ProgramTemplate; 7] = [
        ProgramTemplate::FullBody,
        ProgramTemplate::UpperLower,
        ProgramTemplate::PushPullLegs,
        ProgramTemplate::PplUpperLower,
        ProgramTemplate::PplX2,
        ProgramTemplate::PplX2FullBody,
        ProgramTemplate::Custom,
    ];

    /// The literal the LLM is asked to echo back in the `template` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramTemplate::FullBody => "FULL_BODY",
            ProgramTemplate::UpperLower => "UPPER_LOWER",
            ProgramTemplate::PushPullLegs => "PUSH_PULL_LEGS",
            ProgramTemplate::PplUpperLower => "PPL_UPPER_LOWER",
            ProgramTemplate::PplX2 => "PPL_X2",
            ProgramTemplate::PplX2FullBody => "PPL_X2_FULL_BODY",
            ProgramTemplate::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for ProgramTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgramTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProgramTemplate::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown program template '{s}'"))
    }
}

/// One exercise slot in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseAssignment {
    pub exercise_id: i32,
    pub sets: u32,
    pub reps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub exercises: Vec<ExerciseAssignment>,
}

/// A complete weekly program, either LLM-curated or assembled by the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProgram {
    pub template: ProgramTemplate,
    pub sessions: Vec<Session>,
}

impl GeneratedProgram {
    /// Checks the structural invariants every returned program must satisfy:
    /// session names match `structure` in order and every assignment has
    /// positive sets and reps.
    pub fn matches_structure(&self, structure: &[String]) -> bool {
        self.sessions.len() == structure.len()
            && self
                .sessions
                .iter()
                .zip(structure)
                .all(|(session, expected)| &session.name == expected)
            && self
                .sessions
                .iter()
                .flat_map(|s| &s.exercises)
                .all(|a| a.sets > 0 && a.reps > 0)
    }

    pub fn exercise_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.sessions
            .iter()
            .flat_map(|s| s.exercises.iter().map(|a| a.exercise_id))
    }
}
