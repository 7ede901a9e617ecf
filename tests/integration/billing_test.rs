// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use chrono::Utc;
use rankscope::infrastructure::billing::signature::signature_header;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use super::helpers::{bearer, create_test_app, create_test_app_with, signup, WEBHOOK_SECRET};

async fn me(app: &super::helpers::TestApp, token: &str) -> Value {
    app.server
        .get("/api/dashboard")
        .add_header("Authorization", bearer(token))
        .await
        .json()
}

#[tokio::test]
async fn test_plans_are_public() {
    let app = create_test_app().await;
    let response = app.server.get("/api/plans").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["demo_mode"], true);
    let plans = body["plans"].as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["price"], "$9.00");
    assert_eq!(plans[1]["price"], "$29.00");
}

#[tokio::test]
async fn test_demo_subscription_switches_plan_immediately() {
    let app = create_test_app().await;
    let token = signup(&app, "buyer@example.com").await;

    let response = app
        .server
        .post("/api/subscribe/professional")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["mode"], "demo");
    assert_eq!(body["plan"], "professional");
    assert!(body["message"].as_str().unwrap().starts_with("DEMO MODE"));

    let dashboard = me(&app, &token).await;
    assert_eq!(dashboard["plan"]["plan"], "professional");
    assert_eq!(dashboard["plan"]["display_name"], "Professional");

    let response = app
        .server
        .post("/api/subscribe/enterprise")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid plan selected.");
}

#[tokio::test]
async fn test_live_subscription_returns_checkout_url() {
    let app = create_test_app_with(|settings| {
        settings.billing.demo_mode = false;
        settings.billing.secret_key = "sk_live_integration".to_string();
    })
    .await;
    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cus_int"})))
        .expect(1)
        .mount(&app.upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_int",
            "url": "https://checkout.stripe.test/c/cs_int",
            "payment_status": "unpaid"
        })))
        .mount(&app.upstream)
        .await;

    let token = signup(&app, "buyer@example.com").await;
    let response = app
        .server
        .post("/api/subscribe/starter")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
    let body: Value = response.json();
    assert_eq!(body["mode"], "checkout");
    assert_eq!(body["session_id"], "cs_int");
    assert_eq!(body["checkout_url"], "https://checkout.stripe.test/c/cs_int");

    // Test plan switching is a demo-only feature
    let response = app
        .server
        .post("/api/test-plan/professional")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_payment_success_requires_session_id() {
    let app = create_test_app().await;
    let token = signup(&app, "buyer@example.com").await;

    let response = app
        .server
        .get("/api/payment/success")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid payment session.");
}

#[tokio::test]
async fn test_signed_webhook_activates_subscription() {
    let app = create_test_app().await;
    let token = signup(&app, "buyer@example.com").await;
    let user_id = me(&app, &token).await["user"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let payload = serde_json::to_vec(&json!({
        "type": "checkout.session.completed",
        "data": {"object": {
            "customer": "cus_hook",
            "metadata": {"user_id": user_id, "plan_name": "starter"}
        }}
    }))
    .unwrap();
    let signature = signature_header(WEBHOOK_SECRET, Utc::now().timestamp(), &payload);

    let response = app
        .server
        .post("/webhook/stripe")
        .add_header("Stripe-Signature", signature)
        .bytes(payload.into())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "Success");

    let dashboard = me(&app, &token).await;
    assert_eq!(dashboard["plan"]["plan"], "starter");
    assert_eq!(dashboard["plan"]["subscription_status"], "active");
}

#[tokio::test]
async fn test_webhook_with_bad_signature_is_rejected() {
    let app = create_test_app().await;
    let response = app
        .server
        .post("/webhook/stripe")
        .add_header("Stripe-Signature", "t=1,v1=00")
        .bytes(b"{}".to_vec().into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Invalid signature");
}

#[tokio::test]
async fn test_demo_plan_switching() {
    let app = create_test_app().await;
    let token = signup(&app, "tester@example.com").await;

    let response = app
        .server
        .post("/api/test-plan/starter")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "TEST MODE: Switched to Starter plan. Test the different features!"
    );
    assert_eq!(body["user"]["plan"], "starter");

    let response = app
        .server
        .post("/api/test-plan/trial")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(
        response.json::<Value>()["message"],
        "TEST MODE: Switched to 7-day trial."
    );

    let response = app
        .server
        .post("/api/test-plan/gold")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
