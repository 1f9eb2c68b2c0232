//! Exercise catalog — read-only access to the exercises a program may draw from.
//!
//! The generator only sees the `ExerciseCatalog` trait; `PgExerciseCatalog` is the
//! Postgres-backed implementation wired in at startup.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::models::exercise::{Exercise, ExerciseMuscleGroupRow, ExerciseRow, MuscleGroupRef};
use crate::models::profile::ExperienceLevel;

/// Inclusive difficulty range of exercises offered to a given experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyBand {
    pub min: i32,
    pub max: i32,
}

impl DifficultyBand {
    pub fn for_level(level: ExperienceLevel) -> Self {
        let max = match level {
            ExperienceLevel::Beginner => 2,
            ExperienceLevel::Intermediate => 4,
            ExperienceLevel::Advanced => 5,
        };
        Self { min: 1, max }
    }

    pub fn contains(&self, difficulty: i32) -> bool {
        (self.min..=self.max).contains(&difficulty)
    }
}

/// Source of eligible exercises and muscle group metadata.
///
/// Carried by the program generator as `Arc<dyn ExerciseCatalog>`.
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Exercises inside `band`. When `body_weight_only` is set, exercises that
    /// need equipment are excluded; otherwise no equipment filter applies.
    async fn find_eligible_exercises(
        &self,
        band: DifficultyBand,
        body_weight_only: bool,
    ) -> Result<Vec<Exercise>>;

    async fn find_muscle_groups_by_ids(&self, ids: &[i32]) -> Result<Vec<MuscleGroupRef>>;
}

pub struct PgExerciseCatalog {
    pool: PgPool,
}

impl PgExerciseCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a PostgreSQL connection pool and wraps it.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ExerciseCatalog for PgExerciseCatalog {
    async fn find_eligible_exercises(
        &self,
        band: DifficultyBand,
        body_weight_only: bool,
    ) -> Result<Vec<Exercise>> {
        let rows = sqlx::query_as::<_, ExerciseRow>(
            r#"
            SELECT id, name, difficulty, body_weight
            FROM exercises
            WHERE difficulty BETWEEN $1 AND $2
              AND ($3 = FALSE OR body_weight = TRUE)
            ORDER BY id
            "#,
        )
        .bind(band.min)
        .bind(band.max)
        .bind(body_weight_only)
        .fetch_all(&self.pool)
        .await?;
        debug_assert!(rows.iter().all(|r| band.contains(r.difficulty)));

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, ExerciseMuscleGroupRow>(
            r#"
            SELECT emg.exercise_id, mg.id AS muscle_group_id, mg.name AS muscle_group_name
            FROM exercise_muscle_groups emg
            JOIN muscle_groups mg ON mg.id = emg.muscle_group_id
            WHERE emg.exercise_id = ANY($1)
            ORDER BY emg.exercise_id, mg.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            "Catalog query: {} exercises, {} muscle group links (difficulty {}..={}, body_weight_only={})",
            rows.len(),
            links.len(),
            band.min,
            band.max,
            body_weight_only
        );

        Ok(attach_muscle_groups(rows, links))
    }

    async fn find_muscle_groups_by_ids(&self, ids: &[i32]) -> Result<Vec<MuscleGroupRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let groups = sqlx::query_as::<_, MuscleGroupRef>(
            "SELECT id, name FROM muscle_groups WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }
}

/// Joins exercise rows with their muscle group links, preserving row order.
fn attach_muscle_groups(rows: Vec<ExerciseRow>, links: Vec<ExerciseMuscleGroupRow>) -> Vec<Exercise> {
    let mut by_exercise: HashMap<i32, Vec<MuscleGroupRef>> = HashMap::new();
    for link in links {
        by_exercise
            .entry(link.exercise_id)
            .or_default()
            .push(MuscleGroupRef {
                id: link.muscle_group_id,
                name: link.muscle_group_name,
            });
    }

    rows.into_iter()
        .map(|row| Exercise {
            muscle_groups: by_exercise.remove(&row.id).unwrap_or_default(),
            id: row.id,
            name: row.name,
            difficulty: row.difficulty,
            body_weight_only: row.body_weight,
        })
        .collect()
}
