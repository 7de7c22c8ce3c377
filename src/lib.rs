pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod response;
pub mod routes;
pub mod todos;

use std::sync::Arc;
use actix_web::HttpResponse;
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, AuthenticatedUser, TokenIssuer};
pub use db::{DbOperations, InMemoryStore, Task, TaskStore, User, UserStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Todo API is running")
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth: Arc<AuthService>,
    pub tasks: Arc<dyn TaskStore>,
}

impl AppState {
    /// Builds the stores named by `database.url`: `memory://` or a Postgres URL.
    pub async fn new(config: Settings) -> Result<Self> {
        if config.database.is_memory() {
            info!("Using in-memory store");
            let store = Arc::new(InMemoryStore::new());
            return Self::with_stores(config, store.clone(), store);
        }

        let store = Arc::new(DbOperations::connect(&config.database).await?);
        info!("Connected to database");
        Self::with_stores(config, store.clone(), store)
    }

    pub fn with_stores(
        config: Settings,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Result<Self> {
        let auth = AuthService::new(users, &config.auth)?;
        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            tasks,
        })
    }
}
