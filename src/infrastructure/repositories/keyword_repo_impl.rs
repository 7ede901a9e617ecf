// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::keyword::{Ranking, TrackedKeyword};
use crate::domain::repositories::keyword_repository::KeywordRepository;
use crate::infrastructure::database::entities::{ranking, tracked_keyword};
use crate::utils::errors::RepositoryError;

/// 追踪关键词与排名仓库实现
#[derive(Clone)]
pub struct KeywordRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl KeywordRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<tracked_keyword::Model> for TrackedKeyword {
    fn from(model: tracked_keyword::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            keyword: model.keyword,
            domain: model.domain,
            created_at: model.created_at.into(),
        }
    }
}

impl From<ranking::Model> for Ranking {
    fn from(model: ranking::Model) -> Self {
        Self {
            id: model.id,
            keyword_id: model.keyword_id,
            position: model.position,
            url: model.url,
            checked_at: model.checked_at.into(),
        }
    }
}

#[async_trait]
impl KeywordRepository for KeywordRepositoryImpl {
    async fn create(&self, keyword: &TrackedKeyword) -> Result<TrackedKeyword, RepositoryError> {
        let active_model = tracked_keyword::ActiveModel {
            id: Set(keyword.id),
            user_id: Set(keyword.user_id),
            keyword: Set(keyword.keyword.clone()),
            domain: Set(keyword.domain.clone()),
            created_at: Set(keyword.created_at.into()),
        };
        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(model.into())
    }

    async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<TrackedKeyword>, RepositoryError> {
        let model = tracked_keyword::Entity::find_by_id(id)
            .filter(tracked_keyword::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn exists(
        &self,
        user_id: Uuid,
        keyword: &str,
        domain: &str,
    ) -> Result<bool, RepositoryError> {
        let count = tracked_keyword::Entity::find()
            .filter(tracked_keyword::Column::UserId.eq(user_id))
            .filter(tracked_keyword::Column::Keyword.eq(keyword))
            .filter(tracked_keyword::Column::Domain.eq(domain))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<TrackedKeyword>, RepositoryError> {
        let models = tracked_keyword::Entity::find()
            .filter(tracked_keyword::Column::UserId.eq(user_id))
            .order_by_desc(tracked_keyword::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepositoryError> {
        let count = tracked_keyword::Entity::find()
            .filter(tracked_keyword::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }

    async fn list_all(&self) -> Result<Vec<TrackedKeyword>, RepositoryError> {
        let models = tracked_keyword::Entity::find()
            .order_by_asc(tracked_keyword::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        ranking::Entity::delete_many()
            .filter(ranking::Column::KeywordId.eq(id))
            .exec(&txn)
            .await?;
        let result = tracked_keyword::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }

    async fn add_ranking(&self, ranking: &Ranking) -> Result<Ranking, RepositoryError> {
        let active_model = ranking::ActiveModel {
            id: Set(ranking.id),
            keyword_id: Set(ranking.keyword_id),
            position: Set(ranking.position),
            url: Set(ranking.url.clone()),
            checked_at: Set(ranking.checked_at.into()),
        };
        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(model.into())
    }

    async fn latest_ranking(&self, keyword_id: Uuid) -> Result<Option<Ranking>, RepositoryError> {
        let model = ranking::Entity::find()
            .filter(ranking::Column::KeywordId.eq(keyword_id))
            .order_by_desc(ranking::Column::CheckedAt)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn rankings_since(
        &self,
        keyword_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Ranking>, RepositoryError> {
        let mut query = ranking::Entity::find().filter(ranking::Column::KeywordId.eq(keyword_id));
        if let Some(since) = since {
            query = query.filter(ranking::Column::CheckedAt.gte(since.fixed_offset()));
        }

        let models = query
            .order_by_desc(ranking::Column::CheckedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
