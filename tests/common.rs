#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use letterbox::config::{parse_config, ConfigV1};
use letterbox::routes::create_router;
use letterbox::startup::build_state;
use letterbox::App;
use serde_json::Value;

pub const MEMORY_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:0
logging:
  level: debug
  format: console
session_provider:
  type: memory
  name: "Test users"
  users:
    - id: user-1
      email: writer@example.com
      password: secret
"#;

pub fn load_test_config(yaml: &str) -> ConfigV1 {
    parse_config(yaml).expect("Failed to parse test config YAML")
}

pub async fn build_app(config: ConfigV1) -> (Router, Arc<App>) {
    let state = build_state(Arc::new(config))
        .await
        .expect("app should start");
    let app = state.app.clone();
    (create_router(state), app)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn post(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header missing")
        .to_str()
        .expect("Location header not valid UTF-8")
}

/// Let the auth listener apply any queued auth events.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}
