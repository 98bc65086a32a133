//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use todos::{
    api::routes::create_router,
    auth::{
        jwt::{FixedClock, TokenService},
        password::PasswordHasher,
    },
    db::{TodoRepository, TursoClient},
    AppState,
};

pub const TEST_SECRET: &str = "test_jwt_secret_key_for_testing_only";

/// A running router plus handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<TursoClient>,
    pub tokens: Arc<TokenService>,
    pub clock: Arc<FixedClock>,
}

/// Cheap Argon2 parameters so tests stay fast.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(1, 1024).expect("valid hasher params")
}

pub fn test_tokens(clock: Arc<FixedClock>) -> Arc<TokenService> {
    Arc::new(
        TokenService::new(TEST_SECRET, Duration::hours(24))
            .expect("valid token config")
            .with_clock(clock),
    )
}

/// App over an in-memory database with a controllable clock.
pub async fn create_test_app() -> TestApp {
    let db = Arc::new(
        TursoClient::new_memory()
            .await
            .expect("Failed to create in-memory database"),
    );
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let tokens = test_tokens(clock.clone());

    let state = AppState::new(db.clone(), db.clone(), tokens.clone(), test_hasher());
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    TestApp {
        server,
        db,
        tokens,
        clock,
    }
}

/// App whose todo storage is the given repository; accounts stay in memory.
pub async fn create_test_app_with_todos(todos: Arc<dyn TodoRepository>) -> TestApp {
    let db = Arc::new(
        TursoClient::new_memory()
            .await
            .expect("Failed to create in-memory database"),
    );
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let tokens = test_tokens(clock.clone());

    let state = AppState::new(db.clone(), todos, tokens.clone(), test_hasher());
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    TestApp {
        server,
        db,
        tokens,
        clock,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Registers and logs in a user, returning `(token, user_id)`.
pub async fn register_and_login(server: &TestServer, username: &str) -> (String, String) {
    let email = format!("{}@example.com", username);

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status_code(), 201, "register {}", username);

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let token = body["token"].as_str().expect("token").to_string();
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();
    (token, user_id)
}

/// Creates a todo through the API and returns its id.
pub async fn create_todo(server: &TestServer, token: &str, title: &str) -> String {
    let response = server
        .post("/api/todos")
        .add_header("Authorization", bearer(token))
        .json(&json!({ "title": title, "description": format!("about {}", title) }))
        .await;
    assert_eq!(response.status_code(), 201, "create todo {}", title);

    let body: Value = response.json();
    body["data"]["id"].as_str().expect("todo id").to_string()
}
