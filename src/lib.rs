use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod store;

use auth::IdentityVerifier;
use store::TaskStore;

/// Process-scoped services, built once in `main` and shared by every
/// request. Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub store: Arc<dyn TaskStore>,
    /// Static path segment the task routes live under. A routing prefix
    /// shared with clients out-of-band; the bearer token is the actual
    /// authentication boundary.
    pub api_path_secret: String,
}

pub fn app(state: AppState) -> Router {
    let secret = state.api_path_secret.trim_matches('/').to_string();

    Router::new()
        // Public
        .route("/", get(root))
        // Task routes, token-gated
        .nest(&format!("/{}", secret), task_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn task_routes(state: AppState) -> Router<AppState> {
    use handlers::tasks;

    Router::new()
        .route(
            "/tasks",
            post(tasks::create)
                .get(tasks::list)
                .delete(tasks::delete_completed),
        )
        .route("/tasks/:id", patch(tasks::update_completed))
        // Every task route authenticates first; no cross-request state
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::require_bearer,
        ))
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "working" }))
}
