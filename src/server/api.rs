//! API route definitions

use std::sync::Arc;
use axum::{
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{error::ServerError, handlers, state::AppState};

async fn handle_404() -> impl IntoResponse {
    ServerError::NotFound("Not found. Use POST /predict_price or GET /health.".to_string())
}

async fn handle_405() -> impl IntoResponse {
    ServerError::MethodNotAllowed("Method not allowed".to_string())
}

/// CORS from `CORS_ORIGIN`; allows all origins when unset or `*`
fn cors_layer() -> CorsLayer {
    let origin = std::env::var("CORS_ORIGIN")
        .ok()
        .filter(|o| !o.is_empty() && o != "*")
        .and_then(|o| o.parse::<HeaderValue>().ok());

    let cors = match origin {
        Some(origin) => CorsLayer::new().allow_origin(origin),
        None => CorsLayer::new().allow_origin(Any),
    };
    cors.allow_methods(Any).allow_headers(Any)
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict_price", post(handlers::predict_price))
        .route("/health", get(handlers::health_check))
        .fallback(handle_404)
        .method_not_allowed_fallback(handle_405)
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
