//! Database module for the todo API
//!
//! This module holds the user and task models, the store traits the HTTP
//! layer talks to, and their Postgres and in-memory implementations.

pub mod memory;
pub mod models;
pub mod operations;
pub mod store;

pub use memory::InMemoryStore;
pub use models::{NewTask, NewUser, Role, Task, TaskId, TaskPatch, User};
pub use operations::DbOperations;
pub use store::{TaskStore, UserStore};
