//! Prediction HTTP server
//!
//! Loads the persisted artifacts once at startup and serves
//! `POST /predict_price` plus a health probe.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use crate::inference::PredictionService;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub models_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            models_dir: std::env::var("MODELS_DIR").unwrap_or_else(|_| "./models".to_string()),
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, models_dir: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            models_dir: models_dir.into(),
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Start the server with the given configuration.
///
/// Artifacts are loaded before the listener is bound; a load failure is
/// returned and no request is ever served.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(models_dir = %config.models_dir, "Loading prediction artifacts");

    let service = match PredictionService::load(&config.models_dir) {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, models_dir = %config.models_dir, "Cannot start without trained artifacts");
            return Err(e.into());
        }
    };

    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config.clone(), service));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        started_at = %start_time.to_rfc3339(),
        "Flight price server listening"
    );
    info!(url = %format!("http://{}/predict_price", addr), "Prediction endpoint available");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install ctrl+c handler, running until killed");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
