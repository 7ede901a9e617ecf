// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::seo_analysis::SeoAnalysisRecord;
use crate::utils::errors::RepositoryError;

/// SEO 分析记录仓库特质
#[async_trait]
pub trait SeoAnalysisRepository: Send + Sync {
    async fn create(&self, record: &SeoAnalysisRecord) -> Result<SeoAnalysisRecord, RepositoryError>;

    /// 查找用户在 `since` 之后对同一 URL 的最新分析
    async fn find_recent(
        &self,
        user_id: Uuid,
        url: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SeoAnalysisRecord>, RepositoryError>;

    /// 按创建时间倒序
    async fn list_recent(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<SeoAnalysisRecord>, RepositoryError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepositoryError>;
}
