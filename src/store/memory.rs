use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{StoreError, Task, TaskDraft, TaskStore};

/// In-process task store for the test suite. Same contract as
/// [`super::PgTaskStore`], plus failure injection so the 500 paths can be
/// exercised without a database.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
    fail: AtomicBool,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every store operation fails with a `Query` error until
    /// cleared again.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Total rows across all owners. Lets tests assert that rejected
    /// requests performed no store write.
    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_fail(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StoreError::Query("injected test failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        self.check_fail()?;

        let task = Task {
            id: Uuid::new_v4(),
            owner_id: draft.owner_id,
            title: draft.title,
            completed: false,
            created_at: Utc::now(),
        };
        self.tasks.lock().unwrap().push(task.clone());

        Ok(task)
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        self.check_fail()?;

        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.check_fail()?;

        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn save(&self, task: &Task) -> Result<(), StoreError> {
        self.check_fail()?;

        let mut tasks = self.tasks.lock().unwrap();
        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            existing.completed = task.completed;
        }

        Ok(())
    }

    async fn delete_completed(&self, owner_id: &str) -> Result<u64, StoreError> {
        self.check_fail()?;

        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.owner_id == owner_id && t.completed));

        Ok((before - tasks.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(owner: &str, title: &str) -> TaskDraft {
        TaskDraft {
            owner_id: owner.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_defaults_to_incomplete() {
        let store = MemoryTaskStore::new();
        let task = store.insert(draft("a", "buy milk")).await.unwrap();

        assert!(!task.completed);
        assert_eq!(task.owner_id, "a");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_owner_is_scoped() {
        let store = MemoryTaskStore::new();
        store.insert(draft("a", "one")).await.unwrap();
        store.insert(draft("b", "two")).await.unwrap();

        let tasks = store.find_by_owner("a").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "one");
    }

    #[tokio::test]
    async fn test_save_updates_only_completed() {
        let store = MemoryTaskStore::new();
        let mut task = store.insert(draft("a", "one")).await.unwrap();
        task.completed = true;
        store.save(&task).await.unwrap();

        let found = store.find_by_id(task.id).await.unwrap().unwrap();
        assert!(found.completed);
        assert_eq!(found.title, "one");
    }

    #[tokio::test]
    async fn test_delete_completed_leaves_other_owners_alone() {
        let store = MemoryTaskStore::new();
        let mut done = store.insert(draft("a", "done")).await.unwrap();
        done.completed = true;
        store.save(&done).await.unwrap();
        store.insert(draft("a", "pending")).await.unwrap();

        let mut other = store.insert(draft("b", "other done")).await.unwrap();
        other.completed = true;
        store.save(&other).await.unwrap();

        let deleted = store.delete_completed("a").await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(store.find_by_owner("a").await.unwrap().len(), 1);
        assert_eq!(store.find_by_owner("b").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_hits_every_operation() {
        let store = MemoryTaskStore::new();
        store.set_fail(true);

        assert!(store.insert(draft("a", "x")).await.is_err());
        assert!(store.find_by_owner("a").await.is_err());
        assert!(store.find_by_id(Uuid::new_v4()).await.is_err());
        assert!(store.delete_completed("a").await.is_err());

        store.set_fail(false);
        assert!(store.insert(draft("a", "x")).await.is_ok());
    }
}
