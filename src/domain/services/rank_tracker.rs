// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::keyword::{KeywordWithRanking, Ranking, TrackedKeyword};
use crate::domain::models::plan::Feature;
use crate::domain::models::user::User;
use crate::domain::repositories::keyword_repository::KeywordRepository;
use crate::utils::errors::{RepositoryError, ServiceError};
use crate::utils::sanitize::sanitize_input;
use crate::utils::url_utils::clean_domain;

/// 非专业版可查看的历史天数
const RESTRICTED_HISTORY_DAYS: i64 = 7;

/// 新增追踪关键词的结果
#[derive(Debug, Clone, Serialize)]
pub struct AddKeywordOutcome {
    pub success: bool,
    pub position: Option<i32>,
    pub keyword_id: Uuid,
}

/// 单个关键词的排名历史
#[derive(Debug, Clone, Serialize)]
pub struct RankingHistory {
    pub keyword: KeywordWithRanking,
    /// 按检查时间倒序
    pub rankings: Vec<Ranking>,
    /// 只包含最近 7 天时为 true
    pub limited: bool,
}

/// 排名追踪服务
pub struct RankTracker {
    keyword_repo: Arc<dyn KeywordRepository>,
}

impl RankTracker {
    pub fn new(keyword_repo: Arc<dyn KeywordRepository>) -> Self {
        Self { keyword_repo }
    }

    /// 新增追踪关键词并立即记录一次排名
    ///
    /// # 参数
    ///
    /// * `user` - 当前用户
    /// * `raw_keyword` - 关键词
    /// * `raw_domain` - 域名，可带协议和 `www.`
    ///
    /// # 返回值
    ///
    /// * `Ok(AddKeywordOutcome)` - 新关键词 ID 与初始排名
    /// * `Err(ServiceError)` - 超过上限 (429/403)、参数缺失 (400)、重复 (409)
    pub async fn add_keyword(
        &self,
        user: &User,
        raw_keyword: &str,
        raw_domain: &str,
    ) -> Result<AddKeywordOutcome, ServiceError> {
        let now = Utc::now();
        let limits = user.plan_limits(now);

        let tracked = self.keyword_repo.count_by_user(user.id).await?;
        if !user.can_use_feature(Feature::TrackedKeywords, tracked, now) {
            return Err(ServiceError::LimitReached(format!(
                "Tracking limit reached. You can track up to {} keywords with your current plan.",
                limits.tracked_keywords
            )));
        }

        let keyword = sanitize_input(raw_keyword);
        let domain = sanitize_input(raw_domain);
        if keyword.is_empty() || domain.is_empty() {
            return Err(ServiceError::Validation(
                "Keyword and domain are required".to_string(),
            ));
        }
        let domain = clean_domain(&domain);

        // Re-count right before the insert; concurrent adds may have landed
        let tracked = self.keyword_repo.count_by_user(user.id).await?;
        if !limits.allows(Feature::TrackedKeywords, tracked as i64) {
            return Err(ServiceError::PlanRestricted(format!(
                "Keyword limit reached. {} plan allows {} keywords.",
                user.plan_display_name(now),
                limits.tracked_keywords
            )));
        }

        if self.keyword_repo.exists(user.id, &keyword, &domain).await? {
            return Err(duplicate_keyword());
        }

        let tracked_keyword = self
            .keyword_repo
            .create(&TrackedKeyword::new(user.id, keyword, domain))
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists => duplicate_keyword(),
                other => other.into(),
            })?;

        let position = self.record_ranking(&tracked_keyword).await?;

        tracing::info!(
            "User {} started tracking '{}' for {}",
            user.id,
            tracked_keyword.keyword,
            tracked_keyword.domain
        );

        Ok(AddKeywordOutcome {
            success: true,
            position,
            keyword_id: tracked_keyword.id,
        })
    }

    /// 用户的全部追踪关键词及最新排名
    pub async fn list_keywords(&self, user: &User) -> Result<Vec<KeywordWithRanking>, ServiceError> {
        let keywords = self.keyword_repo.list_by_user(user.id, None).await?;
        let mut results = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let latest = self.keyword_repo.latest_ranking(keyword.id).await?;
            results.push(KeywordWithRanking::new(keyword, latest));
        }
        Ok(results)
    }

    /// 删除关键词及其排名记录
    pub async fn delete_keyword(&self, user: &User, keyword_id: Uuid) -> Result<(), ServiceError> {
        let keyword = self
            .keyword_repo
            .find_for_user(keyword_id, user.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Keyword not found".to_string()))?;

        self.keyword_repo.delete(keyword.id).await?;
        Ok(())
    }

    /// 排名历史
    ///
    /// 没有历史数据权限的用户只能看到最近 7 天
    pub async fn ranking_history(
        &self,
        user: &User,
        keyword_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RankingHistory, ServiceError> {
        let keyword = self
            .keyword_repo
            .find_for_user(keyword_id, user.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Keyword not found".to_string()))?;

        let limited = !user.can_access_historical_data(now);
        let since = limited.then(|| now - Duration::days(RESTRICTED_HISTORY_DAYS));
        let rankings = self.keyword_repo.rankings_since(keyword.id, since).await?;
        let latest = rankings.first().cloned();

        Ok(RankingHistory {
            keyword: KeywordWithRanking::new(keyword, latest),
            rankings,
            limited,
        })
    }

    /// 导出 CSV
    ///
    /// 列：keyword, domain, position, last_checked, created_at
    pub async fn export_csv(&self, user: &User, now: DateTime<Utc>) -> Result<String, ServiceError> {
        if !user.can_export_csv(now) {
            return Err(ServiceError::PlanRestricted(
                "CSV export is available on the Professional plan.".to_string(),
            ));
        }

        let keywords = self.list_keywords(user).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        let write_err = |e: csv::Error| ServiceError::Internal(format!("CSV write failed: {}", e));
        writer
            .write_record(["keyword", "domain", "position", "last_checked", "created_at"])
            .map_err(write_err)?;
        for k in &keywords {
            writer
                .write_record([
                    k.keyword.clone(),
                    k.domain.clone(),
                    k.position.map(|p| p.to_string()).unwrap_or_default(),
                    k.last_checked.map(|t| t.to_rfc3339()).unwrap_or_default(),
                    k.created_at.to_rfc3339(),
                ])
                .map_err(write_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ServiceError::Internal(format!("CSV flush failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// 为所有追踪关键词记录一次新的排名
    ///
    /// 单个关键词失败只记录日志
    ///
    /// # 返回值
    ///
    /// 成功记录的数量
    pub async fn refresh_all(&self) -> Result<usize, ServiceError> {
        let keywords = self.keyword_repo.list_all().await?;
        let mut refreshed = 0;
        for keyword in &keywords {
            match self.record_ranking(keyword).await {
                Ok(_) => refreshed += 1,
                Err(e) => tracing::warn!("Failed to refresh ranking for {}: {}", keyword.id, e),
            }
        }
        Ok(refreshed)
    }

    async fn record_ranking(&self, keyword: &TrackedKeyword) -> Result<Option<i32>, ServiceError> {
        let position = Some(check_keyword_ranking(
            &keyword.keyword,
            &keyword.domain,
            &mut rand::rng(),
        ));
        self.keyword_repo
            .add_ranking(&Ranking::observe(keyword, position))
            .await?;
        counter!("rank_checks_total").increment(1);
        Ok(position)
    }
}

fn duplicate_keyword() -> ServiceError {
    ServiceError::Conflict("Already tracking this keyword for this domain".to_string())
}

/// 模拟排名检查
///
/// 长尾词 (>= 3 个词) 1-15；含 best / how to / guide / tutorial 5-25；
/// 关键词包含域名首段（品牌词）1-10；其他 10-50
pub fn check_keyword_ranking<R: Rng + ?Sized>(keyword: &str, domain: &str, rng: &mut R) -> i32 {
    let lower = keyword.to_lowercase();
    let brand = domain.split('.').next().unwrap_or_default();

    if keyword.split_whitespace().count() >= 3 {
        rng.random_range(1..=15)
    } else if ["best", "how to", "guide", "tutorial"]
        .iter()
        .any(|term| lower.contains(term))
    {
        rng.random_range(5..=25)
    } else if lower.contains(brand) {
        rng.random_range(1..=10)
    } else {
        rng.random_range(10..=50)
    }
}

#[cfg(test)]
#[path = "rank_tracker_test.rs"]
mod tests;
