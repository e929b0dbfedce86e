pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/resumes/upload", post(handlers::handle_upload))
        .route("/api/resumes", get(handlers::handle_list_resumes))
        .route("/api/resumes/:id", get(handlers::handle_get_resume))
        // Size bound on uploads, enforced at the edge before the pipeline runs.
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}
