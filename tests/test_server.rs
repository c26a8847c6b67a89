//! Integration test: HTTP prediction endpoint

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use flight_price::inference::PredictionService;
use flight_price::server::{create_router, AppState, ServerConfig};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (tempfile::TempDir, axum::Router) {
    let dir = tempfile::tempdir().unwrap();
    let models_dir = common::train_into(dir.path());
    let service = PredictionService::load(&models_dir).unwrap();

    let config = ServerConfig::new("127.0.0.1", 0, models_dir.display().to_string());
    let state = Arc::new(AppState::new(config, service));
    (dir, create_router(state))
}

async fn post_predict(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict_price")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_predict_price_success() {
    let (_dir, app) = test_app();
    let (status, json) = post_predict(
        app,
        r#"{"departure_time":"2024-06-01T14:30:00","airline":"SA","arrival_airport":"CPT","stops":0,"flight_duration":2.5}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["currency"], "ZAR");
    assert!(json["predicted_price"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let (_dir, app) = test_app();
    let (status, json) = post_predict(
        app,
        r#"{"departure_time":"2024-06-01T14:30:00","arrival_airport":"CPT"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "failed");
    assert!(json["error"].as_str().unwrap().contains("Missing required fields"));
}

#[tokio::test]
async fn test_unseen_airline_succeeds() {
    let (_dir, app) = test_app();
    let (status, json) = post_predict(
        app,
        r#"{"departure_time":"2024-06-01T14:30:00","airline":"ZZZ","arrival_airport":"CPT"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
}

#[tokio::test]
async fn test_unseen_arrival_airport_succeeds() {
    let (_dir, app) = test_app();
    let (status, json) = post_predict(
        app,
        r#"{"departure_time":"2024-06-01T14:30:00","airline":"SA","arrival_airport":"ZZZ","stops":0,"flight_duration":2.5}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["currency"], "ZAR");
    assert!(json["predicted_price"].is_number());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (_dir, app) = test_app();
    let (status, json) = post_predict(app, r#"{"departure_time": "#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "failed");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_wrong_type_is_bad_request() {
    let (_dir, app) = test_app();
    let (status, json) = post_predict(
        app,
        r#"{"departure_time":"2024-06-01T14:30:00","airline":"SA","arrival_airport":"CPT","stops":"two"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "failed");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["features"], 10);
    assert!(json["models_dir"].as_str().unwrap().ends_with("models"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_dir, app) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "failed");
}

#[tokio::test]
async fn test_get_on_predict_is_method_not_allowed() {
    let (_dir, app) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/predict_price").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
