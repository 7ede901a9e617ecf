// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::plan::Feature;
use crate::domain::models::seo_analysis::SeoAnalysisRecord;
use crate::domain::models::user::User;
use crate::domain::repositories::seo_analysis_repository::SeoAnalysisRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::seo_scorer::{analyze_document, gate_report, SeoReport};
use crate::engines::traits::{FetchRequest, PageFetcher};
use crate::utils::errors::ServiceError;
use crate::utils::sanitize::sanitize_input;
use crate::utils::url_utils::ensure_scheme;

/// SEO 审计结果
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    #[serde(flatten)]
    pub report: SeoReport,
    /// 当天已有同一 URL 的分析时为 true
    pub cached: bool,
}

/// SEO 审计服务
///
/// 抓取页面、评分并保存结果；同一用户同一 URL 每天只真正分析一次
pub struct SeoAuditService {
    fetcher: Arc<dyn PageFetcher>,
    analysis_repo: Arc<dyn SeoAnalysisRepository>,
    user_repo: Arc<dyn UserRepository>,
    fetch_timeout: Duration,
}

impl SeoAuditService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        analysis_repo: Arc<dyn SeoAnalysisRepository>,
        user_repo: Arc<dyn UserRepository>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            analysis_repo,
            user_repo,
            fetch_timeout,
        }
    }

    /// 审计页面
    ///
    /// # 参数
    ///
    /// * `user` - 当前用户
    /// * `raw_url` - 用户输入的URL，缺少协议时补 `https://`
    ///
    /// # 返回值
    ///
    /// * `Ok(AuditOutcome)` - 报告，命中当日缓存时不计入用量
    /// * `Err(ServiceError)` - 超过每日上限、URL 为空或页面抓取失败
    pub async fn audit(&self, user: &User, raw_url: &str) -> Result<AuditOutcome, ServiceError> {
        let now = Utc::now();
        // The caller's snapshot may predate a plan change
        let mut user = self
            .user_repo
            .find_by_id(user.id)
            .await?
            .unwrap_or_else(|| user.clone());

        if user.reset_daily_usage_if_needed(now.date_naive()) {
            self.user_repo.reset_usage(user.id, now.date_naive()).await?;
        }
        if !user.can_use_feature(Feature::SeoReports, 0, now) {
            return Err(ServiceError::LimitReached(format!(
                "Daily limit reached. You can perform {} SEO reports per day with your current plan.",
                user.plan_limits(now).seo_reports
            )));
        }

        let url = sanitize_input(raw_url);
        if url.is_empty() {
            return Err(ServiceError::Validation("URL is required".to_string()));
        }
        let url = ensure_scheme(&url);
        let full_access = user.is_professional(now);

        if let Some(record) = self
            .analysis_repo
            .find_recent(user.id, &url, start_of_day(now))
            .await?
        {
            tracing::debug!("Serving cached analysis {} for {}", record.id, url);
            return Ok(AuditOutcome {
                report: gate_report(cached_report(record), full_access),
                cached: true,
            });
        }

        let page = self
            .fetcher
            .fetch(&FetchRequest::new(url.clone(), self.fetch_timeout))
            .await
            .map_err(|e| ServiceError::AnalysisFailed(format!("Failed to fetch URL: {}", e)))?;

        // Stored ungated; each response is cut to the caller's current plan
        let full = analyze_document(&url, &page.content, true);
        histogram!("seo_analysis_score").record(f64::from(full.score));
        counter!("seo_analyses_total").increment(1);

        // The report is still returned when saving fails
        if let Err(e) = self
            .analysis_repo
            .create(&SeoAnalysisRecord::from_report(user.id, &full))
            .await
        {
            tracing::error!("Error saving analysis for {}: {}", url, e);
        }

        if let Err(e) = self
            .user_repo
            .increment_usage(user.id, Feature::SeoReports)
            .await
        {
            tracing::error!("Error updating usage for user {}: {}", user.id, e);
        }

        Ok(AuditOutcome {
            report: gate_report(full, full_access),
            cached: false,
        })
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

/// 从已保存的记录还原报告
///
/// 旧记录没有完整报告时只能还原已持久化的字段，返回前仍需按套餐裁剪
fn cached_report(record: SeoAnalysisRecord) -> SeoReport {
    if let Some(report) = record.report {
        return report;
    }
    SeoReport {
        title_length: record.title.chars().count(),
        meta_description_length: record.meta_description.chars().count(),
        url: record.url,
        title: record.title,
        meta_description: record.meta_description,
        h1_tags: record.h1_tags,
        h2_tags: Vec::new(),
        h3_tags: Vec::new(),
        word_count: record.word_count.max(0) as usize,
        image_count: 0,
        images_without_alt: 0,
        issues: record.issues,
        recommendations: Vec::new(),
        score: record.analysis_score.max(0) as u32,
        limited: false,
        upgrade_message: None,
    }
}
