//! Axum route handlers for the Program Generation API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::FitnessProfile;
use crate::models::program::{GeneratedProgram, ProgramTemplate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateProgramRequest {
    pub profile: FitnessProfile,
    /// Forces a template instead of deriving one from the training frequency.
    pub template: Option<ProgramTemplate>,
}

/// POST /api/v1/programs/generate
///
/// Returns a program for the profile. LLM failures are absorbed by the fallback
/// generator, so only catalog problems produce an error response.
pub async fn handle_generate_program(
    State(state): State<AppState>,
    Json(request): Json<GenerateProgramRequest>,
) -> Result<Json<GeneratedProgram>, AppError> {
    if request.profile.goals.iter().any(|g| g.trim().is_empty()) {
        return Err(AppError::Validation("goals cannot contain blank labels".to_string()));
    }

    let program = state
        .generator
        .generate_program(&request.profile, request.template)
        .await?;

    Ok(Json(program))
}
