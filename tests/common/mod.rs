#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{json, Value};
use todo_api::{AppState, Settings};

pub async fn test_state() -> AppState {
    let config = Settings::new_for_test().expect("Failed to load test config");
    AppState::new(config).await.expect("Failed to build test state")
}

/// Registers a user and returns `(user_id, token)`.
pub async fn register<S, B>(app: &S, name: &str, email: &str, password: &str) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({"name": name, "email": email, "password": password}))
        .send_request(app)
        .await;
    assert_eq!(resp.status(), 201, "registration of {} failed", email);

    let body: Value = test::read_body_json(resp).await;
    (
        body["_id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

/// Creates a todo for `token` and returns its JSON representation.
pub async fn create_todo<S, B>(app: &S, token: &str, payload: Value) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::TestRequest::post()
        .uri("/api/todos")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(payload)
        .send_request(app)
        .await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    body["data"].clone()
}

/// Sends an authenticated request and returns `(status, body)`.
pub async fn call<S, B>(app: &S, req: test::TestRequest, token: &str) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = req
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(app)
        .await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}
