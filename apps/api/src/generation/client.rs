//! Generation Client — asks the LLM for a program and accepts only output that is
//! valid JSON, matches the program schema, echoes the requested template, follows the
//! requested session layout and stays inside the eligible catalog. When the caller
//! rejects empty sessions, a session without exercises is a rejected attempt too.
//!
//! Every rejected attempt is retried through `RetryPolicy`; exhaustion surfaces as
//! `GenerationError::Exhausted` carrying the last failure.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::generation::retry::RetryPolicy;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, CompletionProvider, LlmError};
use crate::models::exercise::Exercise;
use crate::models::program::{ExerciseAssignment, GeneratedProgram, ProgramTemplate, Session};

/// Applied when the LLM lists an exercise without sets.
pub const DEFAULT_SETS: u32 = 3;
/// Applied when the LLM lists an exercise without reps.
pub const DEFAULT_REPS: u32 = 8;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response does not match the program schema: {0}")]
    Schema(String),

    #[error("template mismatch: expected {expected}, got {actual}")]
    TemplateMismatch {
        expected: ProgramTemplate,
        actual: String,
    },

    #[error("session structure mismatch: expected [{expected}], got [{actual}]")]
    SessionStructure { expected: String, actual: String },

    #[error("response references exercises outside the catalog: {0:?}")]
    UnknownExercises(Vec<i32>),

    #[error("response leaves sessions without exercises: {}", .0.join(", "))]
    EmptySessions(Vec<String>),

    #[error("generation failed after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: u32,
        last: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Per-attempt failures are worth another try; exhaustion is final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationError::Exhausted { .. })
    }
}

/// What a response must conform to for one generation request.
#[derive(Debug, Clone)]
pub struct ProgramExpectation {
    pub template: ProgramTemplate,
    pub session_structure: Vec<String>,
    pub eligible_ids: HashSet<i32>,
    pub reject_empty_sessions: bool,
}

impl ProgramExpectation {
    pub fn new(
        template: ProgramTemplate,
        session_structure: Vec<String>,
        exercises: &[Exercise],
    ) -> Self {
        Self {
            template,
            session_structure,
            eligible_ids: exercises.iter().map(|e| e.id).collect(),
            reject_empty_sessions: false,
        }
    }

    pub fn rejecting_empty_sessions(mut self, reject: bool) -> Self {
        self.reject_empty_sessions = reject;
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire schema
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawProgram {
    template: String,
    sessions: Vec<RawSession>,
}

#[derive(Debug, Deserialize)]
struct RawSession {
    name: String,
    exercises: Vec<RawExercise>,
}

/// Exercises may be listed as bare IDs or as `{ "id", "sets"?, "reps"? }` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawExercise {
    Id(i64),
    Detailed {
        id: i64,
        sets: Option<i64>,
        reps: Option<i64>,
    },
}

impl RawExercise {
    fn into_assignment(self) -> Result<ExerciseAssignment, GenerationError> {
        let (id, sets, reps) = match self {
            RawExercise::Id(id) => (id, None, None),
            RawExercise::Detailed { id, sets, reps } => (id, sets, reps),
        };

        let exercise_id = i32::try_from(id)
            .map_err(|_| GenerationError::Schema(format!("exercise id {id} is out of range")))?;

        Ok(ExerciseAssignment {
            exercise_id,
            sets: positive_or_default("sets", sets, DEFAULT_SETS)?,
            reps: positive_or_default("reps", reps, DEFAULT_REPS)?,
        })
    }
}

fn positive_or_default(field: &str, value: Option<i64>, default: u32) -> Result<u32, GenerationError> {
    match value {
        None => Ok(default),
        Some(v) => u32::try_from(v)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| GenerationError::Schema(format!("{field} must be positive, got {v}"))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing and validation
// ────────────────────────────────────────────────────────────────────────────

/// Turns raw LLM text into a program that satisfies `expectation`.
///
/// Steps: strip fences → parse JSON → schema → template → session layout → catalog membership
/// → empty sessions (only when rejected).
pub fn parse_program(
    text: &str,
    expectation: &ProgramExpectation,
) -> Result<GeneratedProgram, GenerationError> {
    let cleaned = strip_json_fences(text);

    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(GenerationError::InvalidJson)?;
    let raw: RawProgram =
        serde_json::from_value(value).map_err(|e| GenerationError::Schema(e.to_string()))?;

    let sessions = raw
        .sessions
        .into_iter()
        .map(|s| {
            let exercises = s
                .exercises
                .into_iter()
                .map(RawExercise::into_assignment)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Session {
                name: s.name,
                exercises,
            })
        })
        .collect::<Result<Vec<_>, GenerationError>>()?;

    if raw.template != expectation.template.as_str() {
        return Err(GenerationError::TemplateMismatch {
            expected: expectation.template,
            actual: raw.template,
        });
    }

    let names: Vec<&str> = sessions.iter().map(|s| s.name.as_str()).collect();
    if names != expectation.session_structure {
        return Err(GenerationError::SessionStructure {
            expected: expectation.session_structure.join(", "),
            actual: names.join(", "),
        });
    }

    let program = GeneratedProgram {
        template: expectation.template,
        sessions,
    };

    let mut unknown: Vec<i32> = program
        .exercise_ids()
        .filter(|id| !expectation.eligible_ids.contains(id))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        unknown.dedup();
        return Err(GenerationError::UnknownExercises(unknown));
    }

    if expectation.reject_empty_sessions {
        let empty: Vec<String> = program
            .sessions
            .iter()
            .filter(|s| s.exercises.is_empty())
            .map(|s| s.name.clone())
            .collect();
        if !empty.is_empty() {
            return Err(GenerationError::EmptySessions(empty));
        }
    }

    Ok(program)
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// LLM-backed program generation with validation and bounded retries.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Generates a validated program, retrying every rejected attempt.
    pub async fn generate(
        &self,
        prompt: &str,
        expectation: &ProgramExpectation,
    ) -> Result<GeneratedProgram, GenerationError> {
        self.retry
            .execute(
                || self.attempt(prompt, expectation),
                GenerationError::is_retryable,
            )
            .await
            .map_err(|last| GenerationError::Exhausted {
                attempts: self.retry.max_attempts.max(1),
                last: Box::new(last),
            })
    }

    async fn attempt(
        &self,
        prompt: &str,
        expectation: &ProgramExpectation,
    ) -> Result<GeneratedProgram, GenerationError> {
        let text = self.provider.complete(JSON_ONLY_SYSTEM, prompt).await?;
        parse_program(&text, expectation)
    }
}
