// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::models::plan::Feature;
use crate::domain::models::user::User;
use crate::utils::errors::RepositoryError;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，邮箱重复时返回 `AlreadyExists`
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    /// 邮箱需已转为小写
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<User>, RepositoryError>;
    /// 整行更新，同时刷新 `updated_at`
    async fn update(&self, user: &User) -> Result<User, RepositoryError>;
    /// 在数据库端将某项每日用量加一，只写计数列
    ///
    /// `Feature::TrackedKeywords` 没有每日计数，调用不产生任何写入
    async fn increment_usage(&self, user_id: Uuid, feature: Feature) -> Result<(), RepositoryError>;
    /// 清零每日用量并记录重置日期
    ///
    /// 当天已重置过时不做任何修改
    async fn reset_usage(&self, user_id: Uuid, today: NaiveDate) -> Result<(), RepositoryError>;
}
