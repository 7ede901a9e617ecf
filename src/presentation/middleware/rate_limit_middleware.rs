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
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

use crate::config::settings::RateLimitingSettings;
use crate::domain::models::user::User;

/// 限流策略，每个策略使用独立的计数空间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitPolicy {
    /// 未单独配置的接口
    Default,
    KeywordResearch,
    SeoAnalysis,
    AddKeyword,
    Signup,
    Login,
}

/// 速率限制器
///
/// 按客户端（用户或 IP）计数的进程内限流器
pub struct RateLimiters {
    enabled: bool,
    default: DefaultKeyedRateLimiter<String>,
    keyword_research: DefaultKeyedRateLimiter<String>,
    seo_analysis: DefaultKeyedRateLimiter<String>,
    add_keyword: DefaultKeyedRateLimiter<String>,
    signup: DefaultKeyedRateLimiter<String>,
    login: DefaultKeyedRateLimiter<String>,
}

fn non_zero(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
}

impl RateLimiters {
    /// 根据配置创建所有限流器
    pub fn from_settings(settings: &RateLimitingSettings) -> Self {
        let hourly = |n| RateLimiter::keyed(Quota::per_hour(non_zero(n)));
        let per_minute = |n| RateLimiter::keyed(Quota::per_minute(non_zero(n)));

        Self {
            enabled: settings.enabled,
            default: hourly(settings.default_per_hour),
            keyword_research: hourly(settings.keyword_research_per_hour),
            seo_analysis: hourly(settings.seo_analysis_per_hour),
            add_keyword: hourly(settings.add_keyword_per_hour),
            signup: per_minute(settings.signup_per_minute),
            login: per_minute(settings.login_per_minute),
        }
    }

    fn limiter(&self, policy: RateLimitPolicy) -> &DefaultKeyedRateLimiter<String> {
        match policy {
            RateLimitPolicy::Default => &self.default,
            RateLimitPolicy::KeywordResearch => &self.keyword_research,
            RateLimitPolicy::SeoAnalysis => &self.seo_analysis,
            RateLimitPolicy::AddKeyword => &self.add_keyword,
            RateLimitPolicy::Signup => &self.signup,
            RateLimitPolicy::Login => &self.login,
        }
    }

    /// 检查客户端是否还有配额
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 允许通过
    /// * `Err(u64)` - 被限流，值为建议等待的秒数
    pub fn check(&self, policy: RateLimitPolicy, client: &str) -> Result<(), u64> {
        if !self.enabled {
            return Ok(());
        }
        self.limiter(policy)
            .check_key(&client.to_string())
            .map_err(|not_until| {
                not_until
                    .wait_time_from(DefaultClock::default().now())
                    .as_secs()
                    .max(1)
            })
    }

    /// 丢弃已恢复满配额的客户端状态
    pub fn retain_recent(&self) {
        for policy in [
            RateLimitPolicy::Default,
            RateLimitPolicy::KeywordResearch,
            RateLimitPolicy::SeoAnalysis,
            RateLimitPolicy::AddKeyword,
            RateLimitPolicy::Signup,
            RateLimitPolicy::Login,
        ] {
            let limiter = self.limiter(policy);
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// 为某个策略生成中间件状态
    pub fn policy(self: &Arc<Self>, policy: RateLimitPolicy) -> RateLimitState {
        RateLimitState {
            limiters: self.clone(),
            policy,
        }
    }
}

/// 限流中间件状态
#[derive(Clone)]
pub struct RateLimitState {
    limiters: Arc<RateLimiters>,
    policy: RateLimitPolicy,
}

/// 限流键：已登录用户按用户计数，否则按客户端 IP
fn client_key(req: &Request) -> String {
    if let Some(user) = req.extensions().get::<User>() {
        return format!("user:{}", user.id);
    }
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return format!("ip:{}", addr.ip());
    }
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(|ip| format!("ip:{}", ip))
        .unwrap_or_else(|| "anonymous".to_string())
}

/// 速率限制中间件
///
/// 超出配额时返回 429 和 `Retry-After`
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);

    match state.limiters.check(state.policy, &client) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            warn!(
                "Rate limit exceeded for {} on {:?} ({})",
                client,
                state.policy,
                request.uri().path()
            );
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": "Rate limit exceeded. Please try again later." })),
            )
                .into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}
