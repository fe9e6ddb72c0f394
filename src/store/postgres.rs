use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, Task, TaskDraft, TaskStore};

/// Postgres-backed task store over a shared long-lived pool. The pool is
/// created once at startup and reused for every request.
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Create the tasks table if it does not exist yet. Idempotent; this is
/// bootstrap convenience, not a migration system.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id UUID PRIMARY KEY,
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS tasks_owner_id_idx ON tasks (owner_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, owner_id, title, completed, created_at)
            VALUES ($1, $2, $3, FALSE, NOW())
            RETURNING id, owner_id, title, completed, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&draft.owner_id)
        .bind(&draft.title)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, title, completed, created_at FROM tasks WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            "SELECT id, owner_id, title, completed, created_at FROM tasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn save(&self, task: &Task) -> Result<(), StoreError> {
        sqlx::query("UPDATE tasks SET completed = $2 WHERE id = $1")
            .bind(task.id)
            .bind(task.completed)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_completed(&self, owner_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE owner_id = $1 AND completed = TRUE")
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
