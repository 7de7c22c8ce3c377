use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::db::models::User;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

fn auth_response(user: User, token: String) -> AuthResponse {
    AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    let user = match state.auth.register(&req.name, &req.email, &req.password).await {
        Ok(user) => user,
        Err(e) => {
            error!("Registration failed for email: {}: {}", req.email, e);
            return Err(e);
        }
    };

    let token = state.auth.issue_token(&user)?;
    Ok(HttpResponse::Created().json(auth_response(user, token)))
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);

    let user = match state.auth.authenticate(&req.email, &req.password).await {
        Ok(user) => user,
        Err(e) => {
            error!("Login failed for email: {}: {}", req.email, e);
            return Err(e);
        }
    };

    info!("Login successful for user {}", user.id);
    let token = state.auth.issue_token(&user)?;
    Ok(HttpResponse::Ok().json(auth_response(user, token)))
}

pub async fn profile(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse::from(user.into_inner()))
}
