// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::keyword::{Ranking, TrackedKeyword};
use crate::utils::errors::RepositoryError;

/// 追踪关键词与排名记录仓库特质
#[async_trait]
pub trait KeywordRepository: Send + Sync {
    async fn create(&self, keyword: &TrackedKeyword) -> Result<TrackedKeyword, RepositoryError>;

    /// 查找属于指定用户的关键词
    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TrackedKeyword>, RepositoryError>;

    async fn exists(
        &self,
        user_id: Uuid,
        keyword: &str,
        domain: &str,
    ) -> Result<bool, RepositoryError>;

    /// 按创建时间倒序，`limit` 为空时返回全部
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<TrackedKeyword>, RepositoryError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepositoryError>;

    /// 所有用户的全部关键词，供后台刷新使用
    async fn list_all(&self) -> Result<Vec<TrackedKeyword>, RepositoryError>;

    /// 删除关键词及其排名记录
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    async fn add_ranking(&self, ranking: &Ranking) -> Result<Ranking, RepositoryError>;

    async fn latest_ranking(&self, keyword_id: Uuid) -> Result<Option<Ranking>, RepositoryError>;

    /// 按检查时间倒序返回排名记录，`since` 为空时不限时间
    async fn rankings_since(
        &self,
        keyword_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Ranking>, RepositoryError>;
}
