use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::db::models::{NewTask, TaskPatch};
use crate::error::AppError;
use crate::response::Envelope;
use crate::todos::OwnedTask;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// GET /api/todos
pub async fn list_todos(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let todos = state.tasks.list(user.user().id).await?;
    Ok(HttpResponse::Ok().json(Envelope::list(todos)))
}

/// GET /api/todos/completed
pub async fn list_completed(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let todos = state.tasks.list_by_status(user.user().id, true).await?;
    Ok(HttpResponse::Ok().json(Envelope::list(todos)))
}

/// GET /api/todos/incomplete
pub async fn list_incomplete(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let todos = state.tasks.list_by_status(user.user().id, false).await?;
    Ok(HttpResponse::Ok().json(Envelope::list(todos)))
}

/// POST /api/todos
pub async fn create_todo(
    user: AuthenticatedUser,
    req: web::Json<CreateTodoRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let new_task = NewTask::new(user.user().id, req.title, req.description, req.completed)?;

    let todo = state.tasks.create(new_task).await?;
    info!("User {} created todo {}", todo.owner, todo.id);
    Ok(HttpResponse::Created().json(Envelope::data(todo)))
}

/// GET /api/todos/{id}
pub async fn get_todo(owned: OwnedTask) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::data(owned.task))
}

/// PUT /api/todos/{id}
pub async fn update_todo(
    owned: OwnedTask,
    patch: web::Json<TaskPatch>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let patch = patch.into_inner().validated()?;
    let todo = state.tasks.update(owned.task.task_id(), patch).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(todo)))
}

/// DELETE /api/todos/{id}
pub async fn delete_todo(
    owned: OwnedTask,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.tasks.delete(owned.task.task_id()).await?;
    info!("User {} deleted todo {}", owned.user.id, owned.task.id);
    Ok(HttpResponse::Ok().json(Envelope::message("Todo deleted successfully")))
}

/// PATCH /api/todos/{id}/toggle
pub async fn toggle_todo(
    owned: OwnedTask,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let todo = state.tasks.toggle(owned.task.task_id()).await?;
    Ok(HttpResponse::Ok().json(Envelope::data(todo)))
}

/// DELETE /api/todos/completed
pub async fn delete_completed(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let count = state.tasks.delete_all_by_status(user.user().id, true).await?;
    info!("User {} cleared {} completed todos", user.user().id, count);
    Ok(HttpResponse::Ok().json(Envelope::message_with_count(
        format!("Deleted {} completed todos", count),
        count,
    )))
}
