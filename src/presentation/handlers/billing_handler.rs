// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::application::dto::payment_request::PaymentSuccessQuery;
use crate::application::AppContext;
use crate::domain::models::plan::Plan;
use crate::domain::services::billing_service::SubscribeOutcome;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;

const SIGNATURE_HEADER: &str = "stripe-signature";

/// 套餐目录
pub async fn plans(Extension(ctx): Extension<Arc<AppContext>>) -> Json<Value> {
    Json(json!({
        "plans": ctx.billing.plans(),
        "demo_mode": ctx.billing.is_demo_mode(),
        "publishable_key": ctx.settings.billing.publishable_key,
    }))
}

/// 订阅套餐
///
/// 演示模式下直接生效，否则返回 Stripe 结账地址
pub async fn subscribe(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
    Path(plan): Path<String>,
) -> Result<Json<SubscribeOutcome>, AppError> {
    let outcome = ctx.billing.subscribe(&user, &plan).await?;
    Ok(Json(outcome))
}

/// 结账完成后的确认
pub async fn payment_success(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PaymentSuccessQuery>,
) -> Result<Json<Value>, AppError> {
    let user = ctx
        .billing
        .confirm_payment(&user, query.session_id.as_deref())
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Payment successful! Your subscription is now active.",
        "user": user,
    })))
}

/// Stripe webhook
///
/// 读取原始请求体用于签名校验
pub async fn stripe_webhook(
    Extension(ctx): Extension<Arc<AppContext>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let event_type = ctx
        .billing
        .handle_webhook(&body, signature, Utc::now())
        .await?;
    tracing::debug!("Webhook {} processed", event_type);
    Ok("Success")
}

/// 演示模式下切换套餐
pub async fn test_plan(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
    Path(plan): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = ctx.accounts.switch_plan_for_testing(&user, &plan).await?;
    let message = match plan.parse::<Plan>() {
        Ok(Plan::Trial) => "TEST MODE: Switched to 7-day trial.".to_string(),
        _ => format!(
            "TEST MODE: Switched to {} plan. Test the different features!",
            user.plan_display_name(Utc::now())
        ),
    };
    Ok(Json(json!({ "success": true, "message": message, "user": user })))
}
