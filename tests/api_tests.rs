mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{bearer, create_test_app, create_todo, register_and_login};
use serde_json::{json, Value};
use todos::{db::TodoRepository, types::Todo};
use uuid::Uuid;

// ============= Service Endpoints =============

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_index_reports_version() {
    let app = create_test_app().await;

    let response = app.server.get("/").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "todo-server");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document() {
    let app = create_test_app().await;

    let response = app.server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/todos/{id}"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer"].is_object());
}

// ============= Authentication Tests =============

#[tokio::test]
async fn test_register_user() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "Alice@Example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_user() {
    let app = create_test_app().await;
    register_and_login(&app.server, "alice").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "someone-else@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let app = create_test_app().await;

    let cases = [
        json!({ "username": "al", "email": "al@example.com", "password": "password123" }),
        json!({ "username": "alice", "email": "not-an-email", "password": "password123" }),
        json!({ "username": "alice", "email": "alice@example.com", "password": "short" }),
    ];

    for body in cases {
        let response = app.server.post("/api/auth/register").json(&body).await;
        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let app = create_test_app().await;
    let (token, user_id) = register_and_login(&app.server, "alice").await;

    let identity = app.tokens.verify(&token).expect("issued token verifies");
    assert_eq!(identity.subject_id, user_id);
    assert_eq!(identity.display_name, "alice");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = create_test_app().await;
    register_and_login(&app.server, "alice").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "wrongpassword" }))
        .await;
    wrong_password.assert_status_unauthorized();

    let unknown_user = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "password123" }))
        .await;
    unknown_user.assert_status_unauthorized();

    let a: Value = wrong_password.json();
    let b: Value = unknown_user.json();
    assert_eq!(a, b);
}

// ============= Authentication Gate =============

#[tokio::test]
async fn test_missing_authorization_header() {
    let app = create_test_app().await;

    let response = app.server.get("/api/todos").await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "Authorization header is required");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;

    for value in [
        token.clone(),
        format!("Token {}", token),
        "Bearer".to_string(),
        format!("Bearer  {}", token),
        format!("Bearer {} extra", token),
    ] {
        let response = app
            .server
            .get("/api/todos")
            .add_header("Authorization", value)
            .await;

        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(
            body["error"],
            "Authorization header format must be Bearer {token}"
        );
    }
}

#[tokio::test]
async fn test_scheme_is_case_insensitive() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;

    let response = app
        .server
        .get("/api/users/me")
        .add_header("Authorization", format!("bearer {}", token))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_bad_tokens_share_one_message() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;

    let mut tampered = token.clone().into_bytes();
    let pos = tampered.len() - 5;
    tampered[pos] = if tampered[pos] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).expect("ascii token");

    for bad in ["garbage".to_string(), "a.b.c".to_string(), tampered] {
        let response = app
            .server
            .get("/api/todos")
            .add_header("Authorization", bearer(&bad))
            .await;

        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(body["error"], "Invalid or expired token");
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;

    app.clock.advance(Duration::hours(24) - Duration::seconds(1));
    app.server
        .get("/api/users/me")
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    app.clock.advance(Duration::seconds(2));
    let response = app
        .server
        .get("/api/users/me")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid or expired token");
}

// ============= Profile =============

#[tokio::test]
async fn test_profile_roundtrip() {
    let app = create_test_app().await;
    let (token, user_id) = register_and_login(&app.server, "alice").await;

    let response = app
        .server
        .get("/api/users/me")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["id"], user_id.as_str());

    let response = app
        .server
        .put("/api/users/me")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "username": "alicia", "email": "alicia@example.com" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["username"], "alicia");
}

#[tokio::test]
async fn test_change_password() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;

    let wrong = app
        .server
        .put("/api/users/me/password")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "current_password": "nope-nope", "new_password": "newpassword" }))
        .await;
    wrong.assert_status_unauthorized();

    let response = app
        .server
        .put("/api/users/me/password")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "current_password": "password123", "new_password": "newpassword" }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    app.server
        .post("/api/auth/login")
        .json(&json!({ "email": "alice@example.com", "password": "newpassword" }))
        .await
        .assert_status_ok();
}

// ============= Todos =============

#[tokio::test]
async fn test_todo_crud() {
    let app = create_test_app().await;
    let (token, user_id) = register_and_login(&app.server, "alice").await;
    let id = create_todo(&app.server, &token, "Buy milk").await;

    let response = app
        .server
        .get(&format!("/api/todos/{}", id))
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Buy milk");
    assert_eq!(body["data"]["user_id"], user_id.as_str());
    assert_eq!(body["data"]["completed"], false);

    let response = app
        .server
        .put(&format!("/api/todos/{}", id))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Buy oat milk", "description": "2L", "completed": false }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Buy oat milk");

    let response = app
        .server
        .patch(&format!("/api/todos/{}/complete", id))
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["completed"], true);

    let response = app
        .server
        .delete(&format!("/api/todos/{}", id))
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    app.server
        .get(&format!("/api/todos/{}", id))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_create_todo_validation() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;

    for title in ["".to_string(), "   ".to_string(), "x".repeat(256)] {
        app.server
            .post("/api/todos")
            .add_header("Authorization", bearer(&token))
            .json(&json!({ "title": title }))
            .await
            .assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_invalid_todo_id() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;

    let response = app
        .server
        .get("/api/todos/not-a-uuid")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid todo ID");
}

#[tokio::test]
async fn test_other_users_todo_is_forbidden_not_hidden() {
    let app = create_test_app().await;
    let (alice, _) = register_and_login(&app.server, "alice").await;
    let (bob, _) = register_and_login(&app.server, "bob").await;
    let id = create_todo(&app.server, &alice, "Alice's secret").await;

    let path = format!("/api/todos/{}", id);

    app.server
        .get(&path)
        .add_header("Authorization", bearer(&bob))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .put(&path)
        .add_header("Authorization", bearer(&bob))
        .json(&json!({ "title": "pwned", "completed": true }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .patch(&format!("{}/complete", path))
        .add_header("Authorization", bearer(&bob))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .delete(&path)
        .add_header("Authorization", bearer(&bob))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .get(&path)
        .add_header("Authorization", bearer(&alice))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Alice's secret");
    assert_eq!(body["data"]["completed"], false);
}

#[tokio::test]
async fn test_identity_7_on_resource_of_9_is_403() {
    let app = create_test_app().await;
    let id = Uuid::new_v4().to_string();
    app.db
        .create_todo(&Todo::new(
            id.clone(),
            "9".to_string(),
            "owned by nine".to_string(),
            String::new(),
        ))
        .await
        .expect("seed todo");

    let token = app.tokens.issue("7", "seven").expect("issue");

    let response = app
        .server
        .get(&format!("/api/todos/{}", id))
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let missing = app
        .server
        .get(&format!("/api/todos/{}", Uuid::new_v4()))
        .add_header("Authorization", bearer(&token))
        .await;
    missing.assert_status_not_found();
}

#[tokio::test]
async fn test_list_is_scoped_paginated_and_searchable() {
    let app = create_test_app().await;
    let (alice, _) = register_and_login(&app.server, "alice").await;
    let (bob, _) = register_and_login(&app.server, "bob").await;

    for i in 1..=12 {
        create_todo(&app.server, &alice, &format!("Alice task {}", i)).await;
    }
    create_todo(&app.server, &alice, "Groceries").await;
    create_todo(&app.server, &bob, "Bob task").await;

    let response = app
        .server
        .get("/api/todos")
        .add_header("Authorization", bearer(&alice))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["pagination"]["current_page"], 1);
    assert_eq!(body["pagination"]["page_size"], 10);
    assert_eq!(body["pagination"]["total_items"], 13);
    assert_eq!(body["pagination"]["total_pages"], 2);
    assert_eq!(body["data"][0]["title"], "Groceries");

    let response = app
        .server
        .get("/api/todos")
        .add_query_param("page", 2)
        .add_header("Authorization", bearer(&alice))
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    let response = app
        .server
        .get("/api/todos")
        .add_query_param("search", "GROCER")
        .add_header("Authorization", bearer(&alice))
        .await;
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total_items"], 1);
    assert_eq!(body["data"][0]["title"], "Groceries");

    let response = app
        .server
        .get("/api/todos")
        .add_query_param("search", "Bob")
        .add_header("Authorization", bearer(&alice))
        .await;
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total_items"], 0);
}

#[tokio::test]
async fn test_list_filters_by_completion() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;
    let done = create_todo(&app.server, &token, "done").await;
    create_todo(&app.server, &token, "open").await;

    app.server
        .patch(&format!("/api/todos/{}/complete", done))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get("/api/todos")
        .add_query_param("completed", true)
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total_items"], 1);
    assert_eq!(body["data"][0]["id"], done.as_str());
}

#[tokio::test]
async fn test_list_ignores_unparseable_query_values() {
    let app = create_test_app().await;
    let (token, _) = register_and_login(&app.server, "alice").await;
    let done = create_todo(&app.server, &token, "done").await;
    create_todo(&app.server, &token, "open").await;

    app.server
        .patch(&format!("/api/todos/{}/complete", done))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    for (key, value) in [
        ("page", "abc"),
        ("page", ""),
        ("page", "99999999999"),
        ("page_size", "-3"),
        ("completed", ""),
        ("completed", "yes"),
    ] {
        let response = app
            .server
            .get("/api/todos")
            .add_query_param(key, value)
            .add_header("Authorization", bearer(&token))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["pagination"]["current_page"], 1, "{}={}", key, value);
        assert_eq!(body["pagination"]["page_size"], 10, "{}={}", key, value);
        assert_eq!(body["pagination"]["total_items"], 2, "{}={}", key, value);
    }

    let response = app
        .server
        .get("/api/todos")
        .add_query_param("completed", "1")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total_items"], 1);
    assert_eq!(body["data"][0]["id"], done.as_str());

    let response = app
        .server
        .get("/api/todos")
        .add_query_param("completed", "F")
        .add_header("Authorization", bearer(&token))
        .await;
    let body: Value = response.json();
    assert_eq!(body["pagination"]["total_items"], 1);
    assert_eq!(body["data"][0]["title"], "open");
}
