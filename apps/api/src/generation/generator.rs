//! Program Generation — orchestrates the full generation pipeline.
//!
//! Flow: select template → load catalog → build prompt → LLM generate (retried)
//!       → on exhaustion, fallback generator → empty-session policy → return.
//!
//! The caller never sees a generation failure: exhaustion is logged and replaced
//! by the catalog-driven fallback. Under the `reject` policy an LLM answer with an
//! empty session is a rejected attempt, so only a fallback program built from a
//! thin catalog can end in `InsufficientCatalog`.

use std::str::FromStr;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::catalog::{DifficultyBand, ExerciseCatalog};
use crate::errors::AppError;
use crate::generation::client::{GenerationClient, ProgramExpectation};
use crate::generation::fallback::generate_fallback;
use crate::generation::prompt_builder::build_program_prompt;
use crate::generation::template::{self, TemplateConstraints, TemplateSelection};
use crate::models::exercise::Exercise;
use crate::models::profile::FitnessProfile;
use crate::models::program::{GeneratedProgram, ProgramTemplate};

/// What to do with a program that contains sessions without exercises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptySessionPolicy {
    /// Return the program as-is.
    #[default]
    Allow,
    /// Fail with `AppError::InsufficientCatalog`.
    Reject,
}

impl FromStr for EmptySessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(EmptySessionPolicy::Allow),
            "reject" => Ok(EmptySessionPolicy::Reject),
            other => Err(format!("expected 'allow' or 'reject', got '{other}'")),
        }
    }
}

/// Entry point for program generation. Stateless between requests; share it
/// behind an `Arc`.
pub struct ProgramGenerator {
    catalog: Arc<dyn ExerciseCatalog>,
    client: GenerationClient,
    empty_session_policy: EmptySessionPolicy,
    fallback_seed: Option<u64>,
}

impl ProgramGenerator {
    pub fn new(
        catalog: Arc<dyn ExerciseCatalog>,
        client: GenerationClient,
        empty_session_policy: EmptySessionPolicy,
        fallback_seed: Option<u64>,
    ) -> Self {
        Self {
            catalog,
            client,
            empty_session_policy,
            fallback_seed,
        }
    }

    /// Generates a weekly program for `profile`, honouring `override_template` when given.
    pub async fn generate_program(
        &self,
        profile: &FitnessProfile,
        override_template: Option<ProgramTemplate>,
    ) -> Result<GeneratedProgram, AppError> {
        // Step 1: Template selection
        let frequency = profile.clamped_frequency();
        let selection = template::select(profile.training_frequency, override_template);
        info!("Template selection: {frequency} days/week → {selection}");

        if let Some(template) = override_template {
            if !TemplateConstraints::for_template(template).is_feasible(frequency) {
                warn!(
                    "Template override {} is outside its feasible frequency range for {} days/week",
                    template, frequency
                );
            }
        }

        // Step 2: Eligible exercises and priority muscle groups
        let band = DifficultyBand::for_level(profile.experience_level);
        let exercises = self
            .catalog
            .find_eligible_exercises(band, profile.body_weight_only)
            .await?;
        let priority_groups = self
            .catalog
            .find_muscle_groups_by_ids(&profile.muscle_priorities)
            .await?;
        info!(
            "Loaded {} eligible exercises and {} priority muscle groups",
            exercises.len(),
            priority_groups.len()
        );

        let program = if exercises.is_empty() {
            warn!("Eligible exercise catalog is empty, skipping LLM generation");
            self.fallback(profile, &selection, &exercises)
        } else {
            // Step 3: Prompt
            let prompt = build_program_prompt(
                profile,
                selection.template,
                &exercises,
                &priority_groups,
                &selection.session_structure,
            );

            // Step 4: LLM generation with retries
            let expectation = ProgramExpectation::new(
                selection.template,
                selection.session_structure.clone(),
                &exercises,
            )
            .rejecting_empty_sessions(self.empty_session_policy == EmptySessionPolicy::Reject);
            match self.client.generate(&prompt, &expectation).await {
                Ok(program) => {
                    info!(
                        "LLM generated {} program with {} sessions",
                        program.template,
                        program.sessions.len()
                    );
                    program
                }
                Err(e) => {
                    warn!("LLM generation exhausted, using fallback generator: {e}");
                    self.fallback(profile, &selection, &exercises)
                }
            }
        };

        debug_assert!(program.matches_structure(&selection.session_structure));
        self.check_empty_sessions(&program)?;
        Ok(program)
    }

    fn fallback(
        &self,
        profile: &FitnessProfile,
        selection: &TemplateSelection,
        exercises: &[Exercise],
    ) -> GeneratedProgram {
        let mut rng = match self.fallback_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        generate_fallback(
            profile,
            selection.template,
            &selection.session_structure,
            exercises,
            &mut rng,
        )
    }

    fn check_empty_sessions(&self, program: &GeneratedProgram) -> Result<(), AppError> {
        if self.empty_session_policy == EmptySessionPolicy::Allow {
            return Ok(());
        }

        let empty: Vec<String> = program
            .sessions
            .iter()
            .filter(|s| s.exercises.is_empty())
            .map(|s| s.name.clone())
            .collect();

        if empty.is_empty() {
            Ok(())
        } else {
            Err(AppError::InsufficientCatalog(empty))
        }
    }
}
