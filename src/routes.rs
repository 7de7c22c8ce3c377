//! Route table and HTTP middleware shared by the binary and the tests.

use actix_cors::Cors;
use actix_web::{middleware::DefaultHeaders, web, HttpResponse, Resource};

use crate::auth::handlers::{login, profile, register};
use crate::config::CorsConfig;
use crate::error::AppError;
use crate::todos::handlers::{
    create_todo, delete_completed, delete_todo, get_todo, list_completed, list_incomplete,
    list_todos, toggle_todo, update_todo,
};
use crate::{health_check, index};

/// Registers every route. `/completed` and `/incomplete` come before `/{id}`
/// so they are never captured as identifiers. Unknown paths and methods get
/// the same JSON envelope as every other error.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .default_service(web::to(route_not_found))
        .service(resource("/").route(web::get().to(index)))
        .service(resource("/health").route(web::get().to(health_check)))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/todos")
                        .service(
                            resource("")
                                .route(web::get().to(list_todos))
                                .route(web::post().to(create_todo)),
                        )
                        .service(
                            resource("/completed")
                                .route(web::get().to(list_completed))
                                .route(web::delete().to(delete_completed)),
                        )
                        .service(resource("/incomplete").route(web::get().to(list_incomplete)))
                        .service(
                            resource("/{id}")
                                .route(web::get().to(get_todo))
                                .route(web::put().to(update_todo))
                                .route(web::delete().to(delete_todo)),
                        )
                        .service(resource("/{id}/toggle").route(web::patch().to(toggle_todo))),
                )
                .service(
                    web::scope("/users")
                        .service(resource("/register").route(web::post().to(register)))
                        .service(resource("/login").route(web::post().to(login)))
                        .service(resource("/profile").route(web::get().to(profile))),
                ),
        );
}

/// A resource whose unmatched methods answer with a 405 envelope.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}

async fn route_not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::RouteNotFound)
}

async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}

/// Malformed JSON bodies become 400 envelopes instead of actix's plain-text errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| AppError::ValidationError(format!("Invalid request body: {}", err)).into())
}

pub fn cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    let cors = if config.allow_any_origin {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
            .allowed_headers(vec!["Authorization", "Content-Type"])
    };

    cors.max_age(config.max_age as usize)
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}
