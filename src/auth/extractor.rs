//! Bearer-token extractor guarding every authenticated route.

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use tracing::warn;

use crate::db::models::User;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// The acting user, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Pulls the token out of the `Authorization` header, if it is a Bearer credential.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);
        let path = req.path().to_string();

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::InternalError("application state not configured".into()))?;
            let token = token.ok_or(AuthError::MissingToken)?;

            match state.auth.resolve(&token).await {
                Ok(user) => Ok(AuthenticatedUser(user)),
                Err(e) => {
                    warn!("Rejected bearer token on {}: {}", path, e);
                    Err(e)
                }
            }
        })
    }
}
