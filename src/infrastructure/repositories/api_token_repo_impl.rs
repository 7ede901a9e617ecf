// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;

use crate::domain::models::api_token::ApiToken;
use crate::domain::repositories::api_token_repository::ApiTokenRepository;
use crate::infrastructure::database::entities::api_token;
use crate::utils::errors::RepositoryError;

/// 访问令牌仓库实现
#[derive(Clone)]
pub struct ApiTokenRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ApiTokenRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<api_token::Model> for ApiToken {
    fn from(model: api_token::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            token_hash: model.token_hash,
            created_at: model.created_at.into(),
            expires_at: model.expires_at.into(),
        }
    }
}

#[async_trait]
impl ApiTokenRepository for ApiTokenRepositoryImpl {
    async fn create(&self, token: &ApiToken) -> Result<ApiToken, RepositoryError> {
        let active_model = api_token::ActiveModel {
            id: Set(token.id),
            user_id: Set(token.user_id),
            token_hash: Set(token.token_hash.clone()),
            created_at: Set(token.created_at.into()),
            expires_at: Set(token.expires_at.into()),
        };
        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(model.into())
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ApiToken>, RepositoryError> {
        let model = api_token::Entity::find()
            .filter(api_token::Column::TokenHash.eq(token_hash))
            .filter(api_token::Column::ExpiresAt.gt(now.fixed_offset()))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<(), RepositoryError> {
        api_token::Entity::delete_many()
            .filter(api_token::Column::TokenHash.eq(token_hash))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = api_token::Entity::delete_many()
            .filter(api_token::Column::ExpiresAt.lte(now.fixed_offset()))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }
}
