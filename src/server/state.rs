//! Application state

use std::sync::Arc;

use crate::inference::PredictionService;

use super::ServerConfig;

/// Shared by every handler; read-only after startup
pub struct AppState {
    pub config: ServerConfig,
    pub service: Arc<PredictionService>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, service: PredictionService) -> Self {
        Self {
            config,
            service: Arc::new(service),
            started_at: chrono::Utc::now(),
        }
    }
}
