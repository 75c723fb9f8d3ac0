pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::questions::handlers;
use crate::state::AppState;

/// A 5 MiB resume grows by a third as base64, plus form fields.
pub const MAX_REQUEST_BYTES: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/questions", post(handlers::handle_generate))
        .route("/api/v1/questions/upload", post(handlers::handle_upload))
        .route("/api/v1/questions/export", post(handlers::handle_export))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}
