//! Shared helpers for HTTP-level tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use tower::ServiceExt;
use userbase::{
    auth::JwtHandler, build_router, config::TokenConfig, users::UserStore, AppState,
};

pub const TEST_SECRET: &str = "integration-test-secret";
/// Lowest cost bcrypt accepts; keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_token_config() -> TokenConfig {
    TokenConfig::new(TEST_SECRET, Algorithm::HS256, Duration::minutes(30)).unwrap()
}

pub fn test_state() -> AppState {
    AppState::new(
        UserStore::open_in_memory().unwrap(),
        JwtHandler::new(test_token_config()),
        TEST_BCRYPT_COST,
    )
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (build_router(state.clone()), state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    into_test_response(app.clone().oneshot(request).await.unwrap()).await
}

/// Send a body as-is, with an optional content type and bearer token
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: &str,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let request = builder.body(Body::from(body.to_string())).unwrap();
    into_test_response(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn login(app: &Router, username: &str, password: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap();

    into_test_response(app.clone().oneshot(request).await.unwrap()).await
}

async fn into_test_response(response: axum::response::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn create_user(app: &Router, username: &str, email: &str, password: &str) -> Value {
    let response = send(
        app,
        Method::POST,
        "/users/",
        None,
        Some(json!({ "username": username, "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body
}

pub async fn token_for(app: &Router, username: &str, password: &str) -> String {
    let response = login(app, username, password).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["access_token"].as_str().unwrap().to_string()
}
