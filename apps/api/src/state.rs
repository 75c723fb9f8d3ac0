use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerationService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable: requests never share mutable state.
#[derive(Clone)]
pub struct AppState {
    /// Production: `LlmClient`. Tests inject a fake.
    pub llm: Arc<dyn GenerationService>,
    pub config: Config,
}
