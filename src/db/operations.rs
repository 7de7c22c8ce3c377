use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::db::models::{NewTask, NewUser, Task, TaskId, TaskPatch, User, UserRow};
use crate::db::store::{TaskStore, UserStore};
use crate::error::DatabaseError;

const TASK_COLUMNS: &str = "id, title, description, completed, user_id, created_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

/// PostgreSQL-backed implementation of both stores.
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    /// Wraps a pool whose schema is already migrated.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Connects with the configured pool limits and applies pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DatabaseError::ConnectionError(format!("migration failed: {}", e)))?;
        info!("Database migrations applied");

        Ok(Self::new(Arc::new(pool)))
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }
}

#[async_trait]
impl UserStore for DbOperations {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let user = user.into_user();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(self.pool())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl TaskStore for DbOperations {
    async fn list(&self, owner: Uuid) -> Result<Vec<Task>, DatabaseError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at, id",
            TASK_COLUMNS
        ))
        .bind(owner)
        .fetch_all(self.pool())
        .await?;

        Ok(tasks)
    }

    async fn list_by_status(&self, owner: Uuid, completed: bool) -> Result<Vec<Task>, DatabaseError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 AND completed = $2 ORDER BY created_at, id",
            TASK_COLUMNS
        ))
        .bind(owner)
        .bind(completed)
        .fetch_all(self.pool())
        .await?;

        Ok(tasks)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, DatabaseError> {
        let task = sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(id.0)
            .fetch_optional(self.pool())
            .await?;

        Ok(task)
    }

    async fn create(&self, task: NewTask) -> Result<Task, DatabaseError> {
        let task = task.into_task();
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, completed, user_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.owner)
        .bind(task.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(task)
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, DatabaseError> {
        let (set_description, description) = match patch.description {
            Some(description) => (true, description),
            None => (false, None),
        };

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = COALESCE($2, title),
                 description = CASE WHEN $3 THEN $4 ELSE description END,
                 completed = COALESCE($5, completed)
             WHERE id = $1
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id.0)
        .bind(patch.title)
        .bind(set_description)
        .bind(description)
        .bind(patch.completed)
        .fetch_optional(self.pool())
        .await?;

        task.ok_or(DatabaseError::NotFound)
    }

    async fn toggle(&self, id: TaskId) -> Result<Task, DatabaseError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET completed = NOT completed WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(self.pool())
        .await?;

        task.ok_or(DatabaseError::NotFound)
    }

    async fn delete(&self, id: TaskId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.0)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn delete_all_by_status(&self, owner: Uuid, completed: bool) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1 AND completed = $2")
            .bind(owner)
            .bind(completed)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
