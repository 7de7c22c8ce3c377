use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{NewTask, NewUser, Task, TaskId, TaskPatch, User};
use crate::error::DatabaseError;

/// Persistence of user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Lookup by (normalised) email, including the password hash.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
}

/// Persistence of tasks. Collection queries are scoped to one owner; single
/// task operations are not, the caller checks ownership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self, owner: Uuid) -> Result<Vec<Task>, DatabaseError>;

    async fn list_by_status(&self, owner: Uuid, completed: bool) -> Result<Vec<Task>, DatabaseError>;

    async fn get(&self, id: TaskId) -> Result<Option<Task>, DatabaseError>;

    async fn create(&self, task: NewTask) -> Result<Task, DatabaseError>;

    /// Fails with `NotFound` when `id` is unknown.
    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, DatabaseError>;

    /// Flips `completed`. Fails with `NotFound` when `id` is unknown.
    async fn toggle(&self, id: TaskId) -> Result<Task, DatabaseError>;

    /// Fails with `NotFound` when `id` is unknown.
    async fn delete(&self, id: TaskId) -> Result<(), DatabaseError>;

    /// Removes every task of `owner` whose flag equals `completed`; returns how many.
    async fn delete_all_by_status(&self, owner: Uuid, completed: bool) -> Result<u64, DatabaseError>;
}
