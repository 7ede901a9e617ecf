// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::keyword_request::{AddKeywordRequestDto, KeywordResearchRequestDto};
use crate::application::AppContext;
use crate::domain::services::rank_tracker::{AddKeywordOutcome, RankingHistory};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::{CurrentUser, MaybeUser};

/// 关键词研究
///
/// 匿名可用；登录用户计入每日用量
pub async fn research(
    Extension(ctx): Extension<Arc<AppContext>>,
    MaybeUser(user): MaybeUser,
    Json(payload): Json<KeywordResearchRequestDto>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let keywords = ctx
        .keyword_research
        .research(user.as_ref(), &payload.keyword)
        .await?;
    Ok(Json(json!({ "keywords": keywords })))
}

/// 新增追踪关键词
pub async fn add_keyword(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AddKeywordRequestDto>,
) -> Result<Json<AddKeywordOutcome>, AppError> {
    payload.validate()?;

    let outcome = ctx
        .rank_tracker
        .add_keyword(&user, &payload.keyword, &payload.domain)
        .await?;
    Ok(Json(outcome))
}

/// 当前用户追踪的关键词及最新排名
pub async fn list_keywords(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    let keywords = ctx.rank_tracker.list_keywords(&user).await?;
    Ok(Json(json!({ "keywords": keywords })))
}

pub async fn delete_keyword(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    ctx.rank_tracker.delete_keyword(&user, id).await?;
    Ok(Json(json!({ "success": true })))
}

/// 排名历史，非专业版只返回最近 7 天
pub async fn ranking_history(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RankingHistory>, AppError> {
    let history = ctx
        .rank_tracker
        .ranking_history(&user, id, Utc::now())
        .await?;
    Ok(Json(history))
}

/// 导出 CSV 附件
pub async fn export_keywords(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let csv = ctx.rank_tracker.export_csv(&user, now).await?;
    let disposition = format!(
        "attachment; filename=\"keywords-{}.csv\"",
        now.format("%Y%m%d")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
