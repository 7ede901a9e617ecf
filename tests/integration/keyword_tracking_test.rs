// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use super::helpers::{bearer, create_test_app, signup};

#[tokio::test]
async fn test_keyword_research_uses_suggestions_and_counts_usage() {
    let app = create_test_app().await;
    Mock::given(method("GET"))
        .and(path("/complete/search"))
        .and(query_param("q", "running shoes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            "running shoes",
            ["running shoes for men", "best running shoes", "running shoes sale"]
        ])))
        .mount(&app.upstream)
        .await;

    // Anonymous research is allowed and not metered
    let response = app
        .server
        .post("/api/keyword-research")
        .json(&json!({ "keyword": "running shoes" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let keywords = body["keywords"].as_array().unwrap();
    assert_eq!(keywords.len(), 3);
    assert_eq!(keywords[1]["keyword"], "best running shoes");

    let token = signup(&app, "research@example.com").await;
    let response = app
        .server
        .post("/api/keyword-research")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "keyword": "<i>running shoes</i>" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let dashboard: Value = app
        .server
        .get("/api/dashboard")
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(dashboard["usage"]["keyword_queries"], 1);
}

#[tokio::test]
async fn test_keyword_research_falls_back_when_suggest_fails() {
    let app = create_test_app().await;
    Mock::given(method("GET"))
        .and(path("/complete/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.upstream)
        .await;

    let response = app
        .server
        .post("/api/keyword-research")
        .json(&json!({ "keyword": "coffee" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["keywords"].as_array().unwrap().len(), 7);

    let response = app
        .server
        .post("/api/keyword-research")
        .json(&json!({ "keyword": "   " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_track_list_history_export_and_delete() {
    let app = create_test_app().await;
    let token = signup(&app, "tracker@example.com").await;
    let auth = bearer(&token);

    let response = app
        .server
        .post("/api/add-keyword")
        .add_header("Authorization", auth.clone())
        .json(&json!({ "keyword": "rust web framework", "domain": "https://www.example.com/" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let added: Value = response.json();
    assert_eq!(added["success"], true);
    let position = added["position"].as_i64().unwrap();
    assert!((1..=15).contains(&position));
    let keyword_id = added["keyword_id"].as_str().unwrap().to_string();

    // Same keyword after domain normalisation
    let response = app
        .server
        .post("/api/add-keyword")
        .add_header("Authorization", auth.clone())
        .json(&json!({ "keyword": "rust web framework", "domain": "example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = app
        .server
        .post("/api/add-keyword")
        .add_header("Authorization", auth.clone())
        .json(&json!({ "keyword": "rust" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let list: Value = app
        .server
        .get("/api/keywords")
        .add_header("Authorization", auth.clone())
        .await
        .json();
    let keywords = list["keywords"].as_array().unwrap();
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0]["domain"], "example.com");
    assert_eq!(keywords[0]["position"].as_i64(), Some(position));

    let history: Value = app
        .server
        .get(&format!("/api/keywords/{}/rankings", keyword_id))
        .add_header("Authorization", auth.clone())
        .await
        .json();
    assert_eq!(history["rankings"].as_array().unwrap().len(), 1);
    assert_eq!(history["rankings"][0]["url"], "https://example.com");
    assert_eq!(history["limited"], false);

    let response = app
        .server
        .get("/api/keywords/export")
        .add_header("Authorization", auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    let csv = response.text();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("keyword,domain,position,last_checked,created_at")
    );
    assert!(lines.next().unwrap().starts_with("rust web framework,example.com,"));

    let other = signup(&app, "other@example.com").await;
    let response = app
        .server
        .delete(&format!("/api/delete-keyword/{}", keyword_id))
        .add_header("Authorization", bearer(&other))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .delete(&format!("/api/delete-keyword/{}", keyword_id))
        .add_header("Authorization", auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let list: Value = app
        .server
        .get("/api/keywords")
        .add_header("Authorization", auth)
        .await
        .json();
    assert!(list["keywords"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_starter_plan_cannot_export() {
    let app = create_test_app().await;
    let token = signup(&app, "starter@example.com").await;
    let auth = bearer(&token);

    let response = app
        .server
        .post("/api/subscribe/starter")
        .add_header("Authorization", auth.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .server
        .get("/api/keywords/export")
        .add_header("Authorization", auth)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["upgrade_required"], true);
}
