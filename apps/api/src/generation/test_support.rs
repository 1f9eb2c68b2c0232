//! Stubs and fixtures shared by the generation tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{DifficultyBand, ExerciseCatalog};
use crate::llm_client::{CompletionProvider, LlmError};
use crate::models::exercise::{Exercise, MuscleGroupRef};
use crate::models::profile::{ExperienceLevel, FitnessProfile};

pub fn exercise(id: i32, groups: &[&str]) -> Exercise {
    Exercise {
        id,
        name: format!("Exercise {id}"),
        difficulty: 1,
        body_weight_only: false,
        muscle_groups: groups
            .iter()
            .enumerate()
            .map(|(i, name)| MuscleGroupRef {
                id: i as i32 + 1,
                name: name.to_string(),
            })
            .collect(),
    }
}

/// Twelve exercises covering every muscle group the fallback filters on.
pub fn sample_catalog() -> Vec<Exercise> {
    let specs: [(i32, &str, i32, bool, &[&str]); 12] = [
        (1, "Bench Press", 2, false, &["chest", "triceps"]),
        (2, "Overhead Press", 3, false, &["shoulders", "triceps"]),
        (3, "Dips", 3, true, &["chest", "triceps"]),
        (4, "Barbell Row", 3, false, &["back", "biceps"]),
        (5, "Pull Up", 4, true, &["back", "biceps"]),
        (6, "Biceps Curl", 1, false, &["biceps"]),
        (7, "Back Squat", 3, false, &["quads", "glutes"]),
        (8, "Romanian Deadlift", 4, false, &["hamstrings", "glutes"]),
        (9, "Calf Raise", 1, true, &["calves"]),
        (10, "Walking Lunge", 2, true, &["quads", "glutes"]),
        (11, "Push Up", 1, true, &["chest", "shoulders", "triceps"]),
        (12, "Face Pull", 2, false, &["shoulders", "back"]),
    ];

    specs
        .into_iter()
        .map(|(id, name, difficulty, body_weight_only, groups)| Exercise {
            name: name.to_string(),
            difficulty,
            body_weight_only,
            ..exercise(id, groups)
        })
        .collect()
}

pub fn profile(level: ExperienceLevel, frequency: i32) -> FitnessProfile {
    FitnessProfile {
        experience_level: level,
        training_frequency: frequency,
        goals: vec!["MUSCLE_GAIN".to_string()],
        weight: Some(80.0),
        target_weight: Some(75.0),
        training_environment: None,
        body_weight_only: false,
        muscle_priorities: vec![],
    }
}

/// Replays canned replies in order; once they run out every call returns `EmptyContent`.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<(String, String)>>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(String, String)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// In-memory catalog applying the same difficulty and equipment filters as Postgres.
pub struct StaticCatalog {
    pub exercises: Vec<Exercise>,
    pub muscle_groups: Vec<MuscleGroupRef>,
}

impl StaticCatalog {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self {
            exercises,
            muscle_groups: vec![
                MuscleGroupRef {
                    id: 1,
                    name: "chest".to_string(),
                },
                MuscleGroupRef {
                    id: 2,
                    name: "back".to_string(),
                },
                MuscleGroupRef {
                    id: 3,
                    name: "glutes".to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl ExerciseCatalog for StaticCatalog {
    async fn find_eligible_exercises(
        &self,
        band: DifficultyBand,
        body_weight_only: bool,
    ) -> anyhow::Result<Vec<Exercise>> {
        Ok(self
            .exercises
            .iter()
            .filter(|e| band.contains(e.difficulty))
            .filter(|e| !body_weight_only || e.body_weight_only)
            .cloned()
            .collect())
    }

    async fn find_muscle_groups_by_ids(&self, ids: &[i32]) -> anyhow::Result<Vec<MuscleGroupRef>> {
        Ok(self
            .muscle_groups
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }
}
