pub mod form;
pub mod health;
pub mod page;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Upload limit for a job description plus a résumé.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(form::handle_form).post(form::handle_form_submit))
        .route("/api/v1/analyze", post(form::handle_api_analyze))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
