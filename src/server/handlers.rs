//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::info;

use crate::inference::{PredictionRequest, PredictionResult};

use super::error::{Result, ServerError};
use super::state::AppState;

/// `POST /predict_price`
pub async fn predict_price(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let Json(body) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let request = PredictionRequest::from_json(body)?;

    let now = chrono::Local::now().naive_local();
    let result = state.service.predict(&request, now)?;

    info!(
        airline = request.airline.as_deref().unwrap_or_default(),
        arrival_airport = request.arrival_airport.as_deref().unwrap_or_default(),
        predicted_price = result.predicted_price,
        "Price predicted"
    );
    Ok(Json(result))
}

/// `GET /health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "features": state.service.preprocessor().n_features_out(),
        "models_dir": state.config.models_dir,
        "uptime_secs": uptime.num_seconds(),
    }))
}
