//! Authentication module for the todo API
//!
//! This module handles password hashing, bearer token issuance and
//! verification, and resolution of the acting user for each request.

pub mod extractor;
pub mod handlers;
mod password;
mod service;
mod token;

pub use extractor::AuthenticatedUser;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{Claims, TokenIssuer};
