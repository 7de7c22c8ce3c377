use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use tracing::warn;

use crate::auth::AuthenticatedUser;
use crate::db::models::{Task, TaskId, User};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::AppState;

/// A task addressed by the `{id}` path segment that belongs to the acting user.
///
/// Resolution order: bearer token (401), identifier format (400), existence
/// (404), ownership (403).
#[derive(Debug, Clone)]
pub struct OwnedTask {
    pub user: User,
    pub task: Task,
}

impl FromRequest for OwnedTask {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth = AuthenticatedUser::from_request(req, payload);
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let raw_id = req.match_info().get("id").map(str::to_string);

        Box::pin(async move {
            let user = auth.await?.into_inner();
            let state = state
                .ok_or_else(|| AppError::InternalError("application state not configured".into()))?;

            let raw_id = raw_id.unwrap_or_default();
            let id: TaskId = raw_id.parse()?;

            let task = state.tasks.get(id).await?.ok_or(DatabaseError::NotFound)?;
            if !task.is_owned_by(user.id) {
                warn!("User {} attempted to access todo {} owned by {}", user.id, task.id, task.owner);
                return Err(AuthError::Forbidden.into());
            }

            Ok(OwnedTask { user, task })
        })
    }
}
