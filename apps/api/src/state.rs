use std::sync::Arc;

use crate::assistant::session::SessionStore;
use crate::catalog::CatalogIndex;
use crate::llm_client::TextGeneration;
use crate::matching::scorer::CandidateScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup.
    pub catalog: Arc<CatalogIndex>,
    pub scorer: CandidateScorer,
    /// Resolved once at startup: enabled when an API key is configured.
    pub generation: TextGeneration,
    pub sessions: Arc<SessionStore>,
}
