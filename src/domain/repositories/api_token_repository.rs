// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::api_token::ApiToken;
use crate::utils::errors::RepositoryError;

/// 访问令牌仓库特质
#[async_trait]
pub trait ApiTokenRepository: Send + Sync {
    async fn create(&self, token: &ApiToken) -> Result<ApiToken, RepositoryError>;
    /// 按摘要查找未过期的令牌
    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiToken>, RepositoryError>;
    async fn delete_by_hash(&self, token_hash: &str) -> Result<(), RepositoryError>;
    /// 清理过期令牌，返回删除数量
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}
