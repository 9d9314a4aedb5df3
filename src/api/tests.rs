use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;

use super::auth::TokenResponse;
use super::health::HealthResponse;
use super::users::ProfileResponse;
use super::{build_router, AppState};
use crate::db::repositories::SqlxUserRepository;
use crate::db::{create_test_pool, migrations};
use crate::services::{TokenService, UserService};

const SECRET: &str = "router-test-secret";

async fn test_server() -> TestServer {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let user_service = UserService::new(
        SqlxUserRepository::boxed(pool.clone()),
        TokenService::new(SECRET, Duration::minutes(30)),
    );
    let state = AppState {
        user_service: Arc::new(user_service),
    };

    TestServer::new(build_router(state, "*").unwrap()).unwrap()
}

fn signup_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "password123",
        "experience_level": "beginner",
        "primary_interest": "humanoid"
    })
}

async fn signup_token(server: &TestServer, email: &str) -> String {
    let response = server.post("/auth/signup").json(&signup_body(email)).await;
    response.assert_status_ok();
    response.json::<TokenResponse>().access_token
}

#[tokio::test]
async fn test_health() {
    let server = test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: HealthResponse = response.json();
    assert_eq!(body.status, "healthy");
    assert_eq!(body.service, "Physical AI Textbook API");
}

#[tokio::test]
async fn test_signup_returns_bearer_token() {
    let server = test_server().await;

    let response = server
        .post("/auth/signup")
        .json(&signup_body("test@example.com"))
        .await;

    response.assert_status_ok();
    let body: TokenResponse = response.json();
    assert_eq!(body.token_type, "bearer");
    assert!(!body.access_token.is_empty());
}

#[tokio::test]
async fn test_repeated_signup_still_succeeds() {
    let server = test_server().await;

    signup_token(&server, "twice@example.com").await;
    let response = server
        .post("/auth/signup")
        .json(&signup_body("twice@example.com"))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_login_with_any_password() {
    let server = test_server().await;
    signup_token(&server, "known@example.com").await;

    let response = server
        .post("/auth/login")
        .json(&json!({"email": "known@example.com", "password": "not-the-password"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<TokenResponse>().token_type, "bearer");
}

#[tokio::test]
async fn test_signup_missing_field_is_rejected() {
    let server = test_server().await;

    let response = server
        .post("/auth/signup")
        .json(&json!({"email": "test@example.com", "password": "pw"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_invalid_email_is_validation_error() {
    let server = test_server().await;

    let response = server
        .post("/auth/signup")
        .json(&signup_body("not-an-email"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["field"], "email");
}

#[tokio::test]
async fn test_login_invalid_email_is_unprocessable() {
    let server = test_server().await;

    let response = server
        .post("/auth/login")
        .json(&json!({"email": "nobody", "password": "pw"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_rejects_values_wider_than_columns() {
    let server = test_server().await;
    let cases = [
        ("email", json!(format!("{}@example.com", "a".repeat(250)))),
        ("experience_level", json!("b".repeat(51))),
        ("primary_interest", json!("h".repeat(101))),
    ];

    for (field, value) in cases {
        let mut body = signup_body("wide@example.com");
        body[field] = value;

        let response = server.post("/auth/signup").json(&body).await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = response.json();
        assert_eq!(error["error"]["details"]["field"], field);
    }

    // Nothing was recorded, so the profile lookup finds no row.
    let token = TokenService::new(SECRET, Duration::minutes(30))
        .issue("wide@example.com", None)
        .unwrap();
    server
        .get("/users/me")
        .authorization_bearer(token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_query_echoes_question() {
    let server = test_server().await;

    let response = server
        .post("/chat/query")
        .json(&json!({"question": "What is ROS 2?"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "response": "I can help you understand: What is ROS 2?...",
        "sources": ["Part 1, Chapter 1"]
    }));
}

#[tokio::test]
async fn test_chat_query_truncates_long_question() {
    let server = test_server().await;
    let question = "ا".repeat(150);

    let response = server
        .post("/chat/query")
        .json(&json!({"question": question, "context": "selected text"}))
        .await;

    let body: Value = response.json();
    let expected = format!("I can help you understand: {}...", "ا".repeat(100));
    assert_eq!(body["response"], expected);
}

#[tokio::test]
async fn test_me_returns_profile() {
    let server = test_server().await;
    let token = signup_token(&server, "me@example.com").await;

    let response = server.get("/users/me").authorization_bearer(token).await;

    response.assert_status_ok();
    let profile: ProfileResponse = response.json();
    assert_eq!(profile.email, "me@example.com");
    assert_eq!(profile.experience_level, "beginner");
    assert_eq!(profile.primary_interest, "humanoid");
    assert!(profile.last_login.is_none());
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let server = test_server().await;

    let response = server.get("/users/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_with_bad_token_is_forbidden() {
    let server = test_server().await;

    let response = server
        .get("/users/me")
        .authorization_bearer("not.a.token")
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_without_profile_is_not_found() {
    let server = test_server().await;
    let token = TokenService::new(SECRET, Duration::minutes(30))
        .issue("ghost@example.com", None)
        .unwrap();

    let response = server.get("/users/me").authorization_bearer(token).await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test]
fn test_cors_layer_accepts_wildcard_and_origin() {
    assert!(super::cors_layer("*").is_ok());
    assert!(super::cors_layer("http://localhost:3000").is_ok());
    assert!(super::cors_layer("bad\norigin").is_err());
}
