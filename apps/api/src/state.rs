use std::sync::Arc;

use crate::generation::generator::ProgramGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the catalog and LLM client; carries no per-request state.
    pub generator: Arc<ProgramGenerator>,
}
