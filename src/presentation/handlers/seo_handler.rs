// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use std::sync::Arc;
use validator::Validate;

use crate::application::dto::seo_request::SeoAnalysisRequestDto;
use crate::application::AppContext;
use crate::domain::services::seo_audit_service::AuditOutcome;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::CurrentUser;

/// 页面 SEO 审计
///
/// # 返回值
///
/// * `Ok(Json<AuditOutcome>)` - 评分报告，非专业版为精简视图
/// * `Err(AppError)` - 超过每日上限 (429) 或页面无法抓取 (400)
pub async fn analyze(
    Extension(ctx): Extension<Arc<AppContext>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<SeoAnalysisRequestDto>,
) -> Result<Json<AuditOutcome>, AppError> {
    payload.validate()?;

    let outcome = ctx.seo_audit.audit(&user, &payload.url).await?;
    Ok(Json(outcome))
}
