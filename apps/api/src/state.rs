use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::AnalysisModel;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. Both services are explicitly constructed in `main` and passed
/// in as trait objects — nothing in the pipeline reaches for globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResumeStore>,
    pub model: Arc<dyn AnalysisModel>,
    pub config: Config,
}
