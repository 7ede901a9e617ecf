// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::http::StatusCode;
use serde_json::Value;

use super::helpers::create_test_app;

/// 健康检查测试
///
/// 验证健康检查端点返回数据库状态和环境
#[tokio::test]
async fn health_check_works() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["environment"], "test");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = create_test_app().await;

    let response = app.server.get("/v1/version").await;
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("x-frame-options"), "SAMEORIGIN");
    assert_eq!(
        response.header("referrer-policy"),
        "strict-origin-when-cross-origin"
    );
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = create_test_app().await;

    let response = app.server.get("/does-not-exist").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Not found");
}

/// 未授权访问测试
///
/// 受保护端点在没有令牌时返回 401
#[tokio::test]
async fn protected_endpoints_return_401_without_auth() {
    let app = create_test_app().await;

    for path in ["/api/dashboard", "/api/keywords", "/api/keywords/export"] {
        let response = app.server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{}", path);
    }
    let response = app
        .server
        .post("/api/seo-analysis")
        .json(&serde_json::json!({ "url": "example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
