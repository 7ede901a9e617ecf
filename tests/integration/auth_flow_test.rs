// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::helpers::{bearer, create_test_app, signup};

#[tokio::test]
async fn test_signup_login_dashboard_logout() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/signup")
        .json(&json!({ "email": "  Ada@Example.com ", "name": "<b>Ada</b>", "password": "s3cret-pass" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let session: Value = response.json();
    assert_eq!(session["success"], true);
    assert_eq!(session["token_type"], "Bearer");
    assert_eq!(session["user"]["email"], "ada@example.com");
    assert_eq!(session["user"]["name"], "Ada");
    assert!(session["user"].get("password_hash").is_none());

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "ada@example.com", "password": "s3cret-pass", "remember": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    let response = app
        .server
        .get("/api/dashboard")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let dashboard: Value = response.json();
    assert_eq!(dashboard["plan"]["plan"], "trial");
    assert_eq!(dashboard["plan"]["is_trial_active"], true);
    assert_eq!(dashboard["total_keywords"], 0);
    assert_eq!(dashboard["features"]["csv_export"], true);

    let response = app
        .server
        .post("/api/logout")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .server
        .get("/api/dashboard")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_signup_and_bad_credentials() {
    let app = create_test_app().await;
    signup(&app, "dup@example.com").await;

    let response = app
        .server
        .post("/api/signup")
        .json(&json!({ "email": "DUP@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = app
        .server
        .post("/api/signup")
        .json(&json!({ "email": "not-an-email" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid email address");

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "email": "dup@example.com", "password": "wrong" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_oversized_name_is_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/signup")
        .json(&json!({ "email": "long@example.com", "name": "x".repeat(300) }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Name is too long");
}

#[tokio::test]
async fn test_google_sign_in_unavailable_without_credentials() {
    let app = create_test_app().await;

    let response = app.server.get("/auth/google").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .server
        .get("/auth/google/callback")
        .add_query_param("code", "abc")
        .add_query_param("state", "bogus")
        .await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_google_callback_rejects_forged_state() {
    let app = create_test_app_with_google().await;

    let response = app.server.get("/auth/google").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let location = response.header("location");
    let location = location.to_str().unwrap();
    assert!(location.contains("client_id=integration-client"));
    assert!(location.contains("state="));

    let response = app
        .server
        .get("/auth/google/callback")
        .add_query_param("code", "abc")
        .add_query_param("state", "1.00.ff")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid OAuth state");
}

async fn create_test_app_with_google() -> super::helpers::TestApp {
    super::helpers::create_test_app_with(|settings| {
        settings.oauth.google_client_id = Some("integration-client".to_string());
        settings.oauth.google_client_secret = Some("integration-secret".to_string());
    })
    .await
}
