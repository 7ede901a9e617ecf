// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::Extension,
    http::{header, HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::application::AppContext;
use crate::presentation::handlers::{
    auth_handler, billing_handler, dashboard_handler, keyword_handler, seo_handler,
};
use crate::presentation::middleware::auth_middleware::{
    auth_middleware, optional_auth_middleware, AuthState,
};
use crate::presentation::middleware::rate_limit_middleware::{
    rate_limit_middleware, RateLimitPolicy, RateLimiters,
};

/// 创建应用路由
///
/// # 参数
///
/// * `ctx` - 应用上下文，以 `Extension` 注入
/// * `limiters` - 限流器，由调用方持有以便定期清理
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(ctx: Arc<AppContext>, limiters: Arc<RateLimiters>) -> Router {
    let auth_state = AuthState {
        accounts: ctx.accounts.clone(),
    };

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/webhook/stripe", post(billing_handler::stripe_webhook))
        .route("/auth/google", get(auth_handler::google_login))
        .route("/auth/google/callback", get(auth_handler::google_callback))
        .route(
            "/api/plans",
            get(billing_handler::plans).layer(from_fn_with_state(
                limiters.policy(RateLimitPolicy::Default),
                rate_limit_middleware,
            )),
        )
        .route(
            "/api/signup",
            post(auth_handler::signup).layer(from_fn_with_state(
                limiters.policy(RateLimitPolicy::Signup),
                rate_limit_middleware,
            )),
        )
        .route(
            "/api/login",
            post(auth_handler::login).layer(from_fn_with_state(
                limiters.policy(RateLimitPolicy::Login),
                rate_limit_middleware,
            )),
        )
        // Optional auth runs first so signed-in users are limited per account
        .route(
            "/api/keyword-research",
            post(keyword_handler::research)
                .layer(from_fn_with_state(
                    limiters.policy(RateLimitPolicy::KeywordResearch),
                    rate_limit_middleware,
                ))
                .layer(from_fn_with_state(
                    auth_state.clone(),
                    optional_auth_middleware,
                )),
        );

    let account_routes = Router::new()
        .route("/api/logout", post(auth_handler::logout))
        .route("/api/dashboard", get(dashboard_handler::dashboard))
        .route("/api/keywords", get(keyword_handler::list_keywords))
        .route("/api/keywords/export", get(keyword_handler::export_keywords))
        .route(
            "/api/keywords/{id}/rankings",
            get(keyword_handler::ranking_history),
        )
        .route(
            "/api/delete-keyword/{id}",
            delete(keyword_handler::delete_keyword),
        )
        .route("/api/subscribe/{plan}", post(billing_handler::subscribe))
        .route("/api/payment/success", get(billing_handler::payment_success))
        .route("/api/test-plan/{plan}", post(billing_handler::test_plan))
        .route_layer(from_fn_with_state(
            limiters.policy(RateLimitPolicy::Default),
            rate_limit_middleware,
        ));

    let metered_routes = Router::new()
        .route(
            "/api/seo-analysis",
            post(seo_handler::analyze).layer(from_fn_with_state(
                limiters.policy(RateLimitPolicy::SeoAnalysis),
                rate_limit_middleware,
            )),
        )
        .route(
            "/api/add-keyword",
            post(keyword_handler::add_keyword).layer(from_fn_with_state(
                limiters.policy(RateLimitPolicy::AddKeyword),
                rate_limit_middleware,
            )),
        );

    let protected_routes = Router::new()
        .merge(account_routes)
        .merge(metered_routes)
        .route_layer(from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(Extension(ctx))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// 数据库不可用时返回 503
pub async fn health_check(Extension(ctx): Extension<Arc<AppContext>>) -> impl IntoResponse {
    let database = match ctx.db.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!("Health check database ping failed: {}", e);
            "unavailable"
        }
    };
    let healthy = database == "connected";

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = Json(json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "database": database,
        "timestamp": Utc::now().to_rfc3339(),
        "environment": ctx.settings.environment,
    }));
    (status, body)
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found" })),
    )
}
