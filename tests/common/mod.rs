#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use stockdesk::application::bootstrap::AppServices;
use stockdesk::config::Config;
use stockdesk::infrastructure::persistence::Database;
use stockdesk::interfaces::http::create_router;
use tower::ServiceExt;

/// Router over a fresh in-memory database.
pub async fn test_app() -> Router {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();

    let db = Database::in_memory().await.expect("in-memory database");
    create_router(AppServices::new(&db, &Config::default()))
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("should build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("should read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("should parse response")
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body), None).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body), None).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None, None).await
}

/// Asserts a failure envelope and returns its message.
pub fn assert_failure(status: StatusCode, body: &Value, expected_status: StatusCode, code: i64) -> String {
    assert_eq!(status, expected_status, "unexpected status, body: {}", body);
    assert_eq!(body["result"], 1);
    assert_eq!(body["code"], code);
    assert!(body.get("body").is_none());
    body["message"].as_str().unwrap_or_default().to_string()
}
