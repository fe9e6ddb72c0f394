#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use tasks_api_rust::auth::{generate_jwt, Claims, JwtVerifier};
use tasks_api_rust::store::MemoryTaskStore;
use tasks_api_rust::{app, AppState};

pub const SECRET_PATH: &str = "hx7q2";
pub const JWT_SECRET: &str = "integration-test-secret";

/// The real router wired to an in-memory store and a verifier with a
/// known secret. Keeping a handle on the store lets tests assert what
/// did (or did not) get written.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryTaskStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryTaskStore::new());
    let state = AppState {
        verifier: Arc::new(JwtVerifier::new(JWT_SECRET)),
        store: store.clone(),
        api_path_secret: SECRET_PATH.to_string(),
    };

    TestApp {
        router: app(state),
        store,
    }
}

pub fn token_for(subject: &str) -> String {
    generate_jwt(&Claims::new(subject), JWT_SECRET).expect("token generation")
}

pub fn expired_token_for(subject: &str) -> String {
    let claims = Claims {
        sub: subject.to_string(),
        exp: 1, // 1970, long expired
        iat: 0,
    };
    generate_jwt(&claims, JWT_SECRET).expect("token generation")
}

pub fn tasks_path() -> String {
    format!("/{}/tasks", SECRET_PATH)
}

pub fn task_path(id: &str) -> String {
    format!("/{}/tasks/{}", SECRET_PATH, id)
}

pub fn request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(req).await.expect("response");
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, body)
}
