use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Muscle group reference as stored in the catalog. Names are matched
/// case-insensitively against session filters ("chest", "quads", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MuscleGroupRef {
    pub id: i32,
    pub name: String,
}

/// A catalog exercise eligible for inclusion in a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i32,
    pub name: String,
    pub difficulty: i32,
    pub body_weight_only: bool,
    pub muscle_groups: Vec<MuscleGroupRef>,
}

impl Exercise {
    /// True when any of this exercise's muscle groups is named in `names`.
    /// `names` must be lowercase.
    pub fn targets_any(&self, names: &[&str]) -> bool {
        self.muscle_groups
            .iter()
            .any(|g| names.contains(&g.name.to_lowercase().as_str()))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ExerciseRow {
    pub id: i32,
    pub name: String,
    pub difficulty: i32,
    pub body_weight: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExerciseMuscleGroupRow {
    pub exercise_id: i32,
    pub muscle_group_id: i32,
    pub muscle_group_name: String,
}
