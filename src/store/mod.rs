use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryTaskStore;
pub use postgres::PgTaskStore;

/// A single task row. `owner_id` is fixed at creation and `completed` is
/// the only field any operation may change afterwards; there is no route
/// that edits `title` or reassigns ownership.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for task creation. The owner always comes from the verified
/// identity, never from the request body.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub owner_id: String,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),
    #[error("store query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Connection(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Persistence boundary for tasks. The production implementation is
/// [`PgTaskStore`]; the test suite substitutes [`MemoryTaskStore`].
///
/// Callers are responsible for ownership checks on `find_by_id`/`save`;
/// `find_by_owner` and `delete_completed` scope by owner inside the query
/// itself so no unfiltered bulk operation exists.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task with `completed = false` and a fresh id and
    /// creation timestamp, returning the stored row.
    async fn insert(&self, draft: TaskDraft) -> Result<Task, StoreError>;

    /// All tasks belonging to `owner_id`, store-native order.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Task>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Persist the task's current `completed` value. Other fields are
    /// immutable and are not written back.
    async fn save(&self, task: &Task) -> Result<(), StoreError>;

    /// Bulk-delete all of `owner_id`'s completed tasks in one store
    /// operation, returning how many rows went away.
    async fn delete_completed(&self, owner_id: &str) -> Result<u64, StoreError>;
}
