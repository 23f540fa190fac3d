//! Shared application state.

use std::sync::Arc;

use mediacat::MergeOrchestrator;

/// State shared across all request handlers.
///
/// The orchestrator is stateless between requests; sharing one instance
/// just shares its configuration.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The merge orchestrator handling every request.
    pub orchestrator: Arc<MergeOrchestrator>,
}

impl AppState {
    /// Build state around an orchestrator.
    pub fn new(orchestrator: MergeOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}
