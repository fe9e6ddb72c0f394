use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::store::TaskDraft;
use crate::AppState;

/// POST /{secret}/tasks - Create a task owned by the caller
///
/// The owner is always the verified subject; any owner/user field in the
/// request body is ignored.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let title = payload
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("title must be a non-empty string"))?;

    let task = state
        .store
        .insert(TaskDraft {
            owner_id: user.subject,
            title: title.to_string(),
        })
        .await?;

    tracing::info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /{secret}/tasks - List the caller's tasks (store-native order)
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state.store.find_by_owner(&user.subject).await?;
    Ok(Json(tasks))
}

/// PATCH /{secret}/tasks/:id - Set a task's completed flag
///
/// A malformed id, a missing task, and a task owned by someone else all
/// produce the same 404, so other users' task ids cannot be probed.
pub async fn update_completed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let completed = payload
        .get("completed")
        .and_then(Value::as_bool)
        .ok_or_else(|| ApiError::bad_request("completed must be a boolean"))?;

    let id = Uuid::parse_str(&id).map_err(|_| task_not_found())?;

    let mut task = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(task_not_found)?;

    if task.owner_id != user.subject {
        return Err(task_not_found());
    }

    task.completed = completed;
    state.store.save(&task).await?;

    Ok(Json(task))
}

/// DELETE /{secret}/tasks - Bulk-delete the caller's completed tasks
pub async fn delete_completed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.store.delete_completed(&user.subject).await?;

    tracing::info!(owner = %user.subject, deleted, "deleted completed tasks");
    Ok(Json(json!({
        "message": "Deleted all completed tasks",
        "deleted": deleted
    })))
}

fn task_not_found() -> ApiError {
    ApiError::not_found("Task not found")
}
