use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenIssuer;
use crate::config::AuthConfig;
use crate::db::models::{NewUser, Role, User};
use crate::db::store::UserStore;
use crate::error::{AppError, AuthError, DatabaseError};

/// Registration, login and token resolution on top of a [`UserStore`].
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
    // Compared against when the email is unknown so a miss costs a full bcrypt round.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: &AuthConfig) -> Result<Self, AppError> {
        let dummy_hash = bcrypt::hash("dummy-password", config.bcrypt_cost)?;
        Ok(Self {
            users,
            tokens: TokenIssuer::new(config),
            bcrypt_cost: config.bcrypt_cost,
            dummy_hash,
        })
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        let name = name.trim();
        let email = normalize_email(email);
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError("Name, email and password are required".into()));
        }
        if !email.contains('@') {
            return Err(AppError::ValidationError("Please provide a valid email".into()));
        }

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email is already registered".into()));
        }

        let password_hash = hash_password(password.to_string(), self.bcrypt_cost).await?;
        let new_user = NewUser {
            name: name.to_string(),
            email,
            password_hash,
            role: Role::Standard,
        };

        match self.users.create_user(new_user).await {
            Ok(user) => {
                info!("Registered user {}", user.id);
                Ok(user)
            }
            // Lost a race with a concurrent registration for the same email.
            Err(DatabaseError::Duplicate) => Err(AppError::Conflict("Email is already registered".into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks credentials; the error does not reveal whether the email exists.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);
        let user = self.users.find_user_by_email(&email).await?;

        let (candidate_hash, user) = match user {
            Some(user) => (user.password_hash.clone(), Some(user)),
            None => (self.dummy_hash.clone(), None),
        };
        let matches = verify_password(password.to_string(), candidate_hash).await?;

        match user {
            Some(user) if matches => Ok(user),
            _ => {
                warn!("Rejected login attempt");
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        self.tokens.issue(user.id)
    }

    /// Verifies a bearer token and loads the user it names.
    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let user_id: Uuid = self.tokens.verify(token)?;
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MockUserStore;
    use crate::db::InMemoryStore;
    use crate::Settings;

    fn auth_config() -> AuthConfig {
        Settings::new_for_test().unwrap().auth
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let service = AuthService::new(Arc::new(InMemoryStore::new()), &auth_config()).unwrap();

        let user = service.register("Ann", " Ann@Example.com ", "password123").await.unwrap();
        assert_eq!(user.email, "ann@example.com");
        assert_eq!(user.role, Role::Standard);
        assert_ne!(user.password_hash, "password123");

        let logged_in = service.authenticate("ann@example.com", "password123").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        let wrong = service.authenticate("ann@example.com", "password124").await;
        assert!(matches!(wrong, Err(AppError::AuthError(AuthError::InvalidCredentials))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_conflict() {
        let service = AuthService::new(Arc::new(InMemoryStore::new()), &auth_config()).unwrap();

        service.register("Ann", "ann@example.com", "pw").await.unwrap();
        let result = service.register("Other Ann", "ANN@example.com", "pw2").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let service = AuthService::new(Arc::new(InMemoryStore::new()), &auth_config()).unwrap();

        assert!(matches!(
            service.register("", "a@b.c", "pw").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.register("Ann", "not-an-email", "pw").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.register("Ann", "a@b.c", "").await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_race_maps_to_conflict() {
        let mut users = MockUserStore::new();
        users.expect_find_user_by_email().returning(|_| Ok(None));
        users
            .expect_create_user()
            .returning(|_| Err(DatabaseError::Duplicate));

        let service = AuthService::new(Arc::new(users), &auth_config()).unwrap();
        let result = service.register("Ann", "ann@example.com", "pw").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let mut users = MockUserStore::new();
        users.expect_find_user_by_email().times(1).returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(users), &auth_config()).unwrap();
        let result = service.authenticate("nobody@example.com", "pw").await;
        assert!(matches!(result, Err(AppError::AuthError(AuthError::InvalidCredentials))));
    }

    #[tokio::test]
    async fn test_resolve_token_for_deleted_user() {
        let mut users = MockUserStore::new();
        users.expect_find_user_by_id().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(users), &auth_config()).unwrap();
        let token = service.tokens().issue(Uuid::new_v4()).unwrap();

        let result = service.resolve(&token).await;
        assert!(matches!(result, Err(AppError::AuthError(AuthError::UserNotFound))));
    }

    #[tokio::test]
    async fn test_resolve_store_failure_is_internal() {
        let mut users = MockUserStore::new();
        users
            .expect_find_user_by_id()
            .returning(|_| Err(DatabaseError::ConnectionError("down".into())));

        let service = AuthService::new(Arc::new(users), &auth_config()).unwrap();
        let token = service.tokens().issue(Uuid::new_v4()).unwrap();

        let result = service.resolve(&token).await;
        assert!(matches!(result, Err(AppError::DatabaseError(DatabaseError::ConnectionError(_)))));
    }
}
