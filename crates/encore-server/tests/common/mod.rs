// Shared test utilities for HTTP integration tests
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use encore_db::{connect, AppState, DatabaseConfig};
use encore_migration::{Migrator, MigratorTrait};
use encore_server::{app, ServerConfig};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router over a fresh, migrated in-memory database.
pub async fn test_app() -> Router {
    let db = connect(&DatabaseConfig::single("sqlite::memory:"))
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    app(Arc::new(AppState { db }), &ServerConfig::default())
}

/// Send one request and return the status with the body parsed as JSON
/// (or as a JSON string when it is plain text).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}
