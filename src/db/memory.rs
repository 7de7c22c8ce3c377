use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{NewTask, NewUser, Task, TaskId, TaskPatch, User};
use crate::db::store::{TaskStore, UserStore};
use crate::error::DatabaseError;

/// Process-local store selected with `database.url = "memory://"`.
///
/// Tasks are kept in insertion order so listings match the creation order the
/// Postgres store returns.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user account. The API has no route for this; it exists so the
    /// "token outlives its user" case can be exercised.
    pub async fn remove_user(&self, id: Uuid) -> bool {
        self.users.write().await.remove(&id).is_some()
    }

    async fn filtered(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|task| keep(*task))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(DatabaseError::Duplicate);
        }
        let user = user.into_user();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn list(&self, owner: Uuid) -> Result<Vec<Task>, DatabaseError> {
        Ok(self.filtered(|task| task.owner == owner).await)
    }

    async fn list_by_status(&self, owner: Uuid, completed: bool) -> Result<Vec<Task>, DatabaseError> {
        Ok(self
            .filtered(|task| task.owner == owner && task.completed == completed)
            .await)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, DatabaseError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|task| task.task_id() == id).cloned())
    }

    async fn create(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let task = task.into_task();
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, DatabaseError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|task| task.task_id() == id)
            .ok_or(DatabaseError::NotFound)?;
        task.apply(patch);
        Ok(task.clone())
    }

    async fn toggle(&self, id: TaskId) -> Result<Task, DatabaseError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|task| task.task_id() == id)
            .ok_or(DatabaseError::NotFound)?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    async fn delete(&self, id: TaskId) -> Result<(), DatabaseError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| task.task_id() != id);
        if tasks.len() == before {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_by_status(&self, owner: Uuid, completed: bool) -> Result<u64, DatabaseError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| !(task.owner == owner && task.completed == completed));
        Ok((before - tasks.len()) as u64)
    }
}
