//! Task routes
//!
//! Collection routes are scoped to the acting user by query; single-task
//! routes go through the [`OwnedTask`] extractor first.

pub mod handlers;
mod ownership;

pub use ownership::OwnedTask;
