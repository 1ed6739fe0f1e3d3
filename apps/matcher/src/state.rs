use std::path::PathBuf;

use crate::analysis::orchestrator::Analyzer;

/// Shared state injected into all route handlers via Axum extractors.
/// Cloned per request; the analyzer shares its backend through an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    /// Uploaded files land here under their sanitized names.
    pub uploads_dir: PathBuf,
}
