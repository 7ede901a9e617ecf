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

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use crate::domain::services::account_service::AccountService;
use crate::presentation::errors::AppError;
use crate::utils::errors::ServiceError;

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    pub accounts: Arc<AccountService>,
}

/// 已认证请求携带的访问令牌，注销时使用
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// 读取 `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}

/// 认证中间件
///
/// 校验访问令牌，并把用户和令牌写入请求扩展
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// 令牌缺失或无效时返回 401
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        debug!("Missing bearer token for {}", req.uri().path());
        return unauthorized("Authentication required");
    };

    match state.accounts.authenticate(&token).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            req.extensions_mut().insert(BearerToken(token));
            next.run(req).await
        }
        Err(ServiceError::Unauthorized(message)) => unauthorized(&message),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// 可选认证中间件
///
/// 令牌有效时写入用户，否则按匿名请求继续处理
pub async fn optional_auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match state.accounts.authenticate(&token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
                req.extensions_mut().insert(BearerToken(token));
            }
            Err(e) => debug!("Ignoring invalid token on optional route: {}", e),
        }
    }
    next.run(req).await
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod auth_middleware_test;
