// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    response::Redirect,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use validator::Validate;

use crate::application::dto::auth_request::{
    LoginRequestDto, OAuthCallbackQuery, SignupRequestDto,
};
use crate::application::AppContext;
use crate::domain::gateways::identity::IdentityProvider;
use crate::domain::services::account_service::Session;
use crate::infrastructure::identity::google_oauth::{sign_state, verify_state};
use crate::presentation::errors::AppError;
use crate::presentation::middleware::auth_middleware::BearerToken;
use crate::utils::errors::ServiceError;

/// 注册并开始试用
///
/// # 参数
///
/// * `ctx` - 应用上下文
/// * `payload` - 注册请求
///
/// # 返回值
///
/// * `Ok(Json<Session>)` - 新会话与访问令牌
/// * `Err(AppError)` - 邮箱无效 (400) 或已注册 (409)
pub async fn signup(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(payload): Json<SignupRequestDto>,
) -> Result<Json<Session>, AppError> {
    payload.validate()?;

    let session = ctx
        .accounts
        .signup(
            &payload.email,
            payload.name.as_deref().unwrap_or_default(),
            payload.password.as_deref(),
        )
        .await?;
    Ok(Json(session))
}

/// 邮箱密码登录
pub async fn login(
    Extension(ctx): Extension<Arc<AppContext>>,
    Json(payload): Json<LoginRequestDto>,
) -> Result<Json<Session>, AppError> {
    payload.validate()?;

    let session = ctx
        .accounts
        .login(
            &payload.email,
            payload.password.as_deref().unwrap_or_default(),
            payload.remember,
        )
        .await?;
    Ok(Json(session))
}

/// 吊销当前令牌
pub async fn logout(
    Extension(ctx): Extension<Arc<AppContext>>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<Json<Value>, AppError> {
    ctx.accounts.logout(&token).await?;
    Ok(Json(json!({ "success": true, "message": "You have been logged out." })))
}

fn identity_provider(ctx: &AppContext) -> Result<&Arc<dyn IdentityProvider>, ServiceError> {
    ctx.identity.as_ref().ok_or_else(|| {
        ServiceError::Unavailable(
            "Google Sign-In requires proper Google Cloud credentials. Please set up your Google OAuth credentials or use email/password authentication.".to_string(),
        )
    })
}

/// 跳转到 Google 授权页面
pub async fn google_login(
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Result<Redirect, AppError> {
    let provider = identity_provider(&ctx)?;
    let state = sign_state(&ctx.settings.security.secret_key, Utc::now().timestamp());
    Ok(Redirect::to(&provider.authorization_url(&state)))
}

/// Google 授权回调
///
/// 校验 `state` 后用授权码换取用户信息并登录
pub async fn google_callback(
    Extension(ctx): Extension<Arc<AppContext>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<Session>, AppError> {
    let provider = identity_provider(&ctx)?;

    if let Some(error) = query.error {
        return Err(ServiceError::Unauthorized(format!("Google authentication failed: {}", error)).into());
    }

    let state_ok = query.state.as_deref().is_some_and(|state| {
        verify_state(&ctx.settings.security.secret_key, state, Utc::now().timestamp())
    });
    if !state_ok {
        return Err(ServiceError::Validation("Invalid OAuth state".to_string()).into());
    }

    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ServiceError::Validation("Missing authorization code".to_string()))?;

    let profile = provider.exchange_code(&code).await.map_err(|e| {
        ServiceError::Upstream(format!(
            "Google authentication failed: {}. Please try again or use email/password login.",
            e
        ))
    })?;

    let session = ctx.accounts.oauth_login(profile).await?;
    Ok(Json(session))
}
