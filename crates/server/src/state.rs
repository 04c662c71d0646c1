//! Application state.

use std::path::PathBuf;
use std::sync::Arc;

use newsletter_core::Pipeline;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, upload_dir: impl Into<PathBuf>) -> Self {
        Self { pipeline: Arc::new(pipeline), upload_dir: Arc::new(upload_dir.into()) }
    }
}
