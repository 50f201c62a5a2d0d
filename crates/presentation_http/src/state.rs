//! Application state shared across handlers

use std::sync::Arc;

use infrastructure::{AppConfig, Logger};

use crate::readiness::Readiness;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Structured logger, injected at startup
    pub logger: Arc<Logger>,
    /// Startup dependency tracking for the readiness endpoint
    pub readiness: Arc<Readiness>,
    /// Application configuration, immutable after startup
    pub config: Arc<AppConfig>,
}
