// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use super::helpers::{bearer, create_test_app, signup};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Trail Running Shoes for Every Terrain | Example Outfitters</title>
  <meta name="description" content="Compare lightweight trail running shoes, read honest reviews and find the right grip, cushioning and fit for your next mountain run.">
</head>
<body>
  <h1>Trail Running Shoes</h1>
  <h2>Best picks</h2>
  <p>Short body copy.</p>
  <img src="a.jpg" alt="shoe">
  <img src="b.jpg">
</body>
</html>"#;

#[tokio::test]
async fn test_analysis_is_scored_then_cached_for_the_day() {
    let app = create_test_app().await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html"))
        .expect(1)
        .mount(&app.upstream)
        .await;

    let token = signup(&app, "auditor@example.com").await;
    let url = format!("{}/landing", app.upstream.uri());

    let response = app
        .server
        .post("/api/seo-analysis")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "url": url }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
    let report: Value = response.json();
    assert_eq!(report["cached"], false);
    assert_eq!(report["url"], url);
    assert_eq!(
        report["title"],
        "Trail Running Shoes for Every Terrain | Example Outfitters"
    );
    assert_eq!(report["images_without_alt"], 1);
    let score = report["score"].as_u64().unwrap();
    assert!(score <= 100);
    // Trial accounts get the restricted view
    assert_eq!(report["limited"], true);

    let response = app
        .server
        .post("/api/seo-analysis")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "url": url }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let cached: Value = response.json();
    assert_eq!(cached["cached"], true);
    assert_eq!(cached["score"].as_u64(), Some(score));

    let dashboard: Value = app
        .server
        .get("/api/dashboard")
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(dashboard["usage"]["seo_reports"], 1);
    assert_eq!(dashboard["total_analyses"], 1);
}

#[tokio::test]
async fn test_unreachable_page_is_a_bad_request() {
    let app = create_test_app().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.upstream)
        .await;

    let token = signup(&app, "auditor@example.com").await;
    let response = app
        .server
        .post("/api/seo-analysis")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "url": format!("{}/missing", app.upstream.uri()) }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch URL"));

    let response = app
        .server
        .post("/api/seo-analysis")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "url": "" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "URL is required");
}

#[tokio::test]
async fn test_private_targets_are_blocked_with_ssrf_protection() {
    let app = super::helpers::create_test_app_with(|settings| {
        settings.analyzer.ssrf_protection = true;
    })
    .await;

    let token = signup(&app, "auditor@example.com").await;
    let response = app
        .server
        .post("/api/seo-analysis")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "url": "http://127.0.0.1:9/admin" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
