// Program Generation Engine
// Implements: template selection, prompt building, LLM generation with retries,
// and the catalog-driven fallback.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod client;
pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
pub mod retry;
pub mod template;

#[cfg(test)]
pub mod test_support;
