use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, DatabaseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Standard,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Standard => "standard",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Role::Standard),
            "admin" => Ok(Role::Admin),
            other => Err(DatabaseError::QueryError(format!("unknown role '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `users` table; the role column is plain text.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

/// A user about to be inserted. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            created_at: Utc::now(),
        }
    }
}

/// Identifier of a task as it arrives in a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);

impl FromStr for TaskId {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(TaskId)
            .map_err(|_| DatabaseError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_id")]
    pub owner: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn task_id(&self) -> TaskId {
        TaskId(self.id)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }

    pub(crate) fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// A validated task about to be inserted for `owner`.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl NewTask {
    pub fn new(
        owner: Uuid,
        title: Option<String>,
        description: Option<String>,
        completed: Option<bool>,
    ) -> Result<Self, AppError> {
        let title = match title {
            Some(title) if !title.trim().is_empty() => title,
            _ => return Err(AppError::ValidationError("Please provide a title for the todo".into())),
        };

        Ok(Self {
            owner,
            title,
            description,
            completed: completed.unwrap_or(false),
        })
    }

    pub fn into_task(self) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            completed: self.completed,
            owner: self.owner,
            created_at: Utc::now(),
        }
    }
}

/// Partial update. Absent fields keep their stored value; `description: null`
/// clears the description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn validated(self) -> Result<Self, AppError> {
        match &self.title {
            Some(title) if title.trim().is_empty() => {
                Err(AppError::ValidationError("Todo title cannot be empty".into()))
            }
            _ => Ok(self),
        }
    }
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
