// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::seo_analysis::SeoAnalysisRecord;
use crate::domain::repositories::seo_analysis_repository::SeoAnalysisRepository;
use crate::infrastructure::database::entities::seo_analysis;
use crate::utils::errors::RepositoryError;

/// SEO 分析仓库实现
///
/// H1、问题列表和完整报告以 JSON 列保存
#[derive(Clone)]
pub struct SeoAnalysisRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl SeoAnalysisRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<seo_analysis::Model> for SeoAnalysisRecord {
    type Error = RepositoryError;

    fn try_from(model: seo_analysis::Model) -> Result<Self, Self::Error> {
        let list = |value: Option<serde_json::Value>| -> Result<Vec<String>, RepositoryError> {
            match value {
                Some(value) => Ok(serde_json::from_value(value)?),
                None => Ok(Vec::new()),
            }
        };

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            url: model.url,
            title: model.title.unwrap_or_default(),
            meta_description: model.meta_description.unwrap_or_default(),
            h1_tags: list(model.h1_tags)?,
            word_count: model.word_count.unwrap_or_default(),
            analysis_score: model.analysis_score.unwrap_or_default(),
            issues: list(model.issues)?,
            report: model.report.map(serde_json::from_value).transpose()?,
            created_at: model.created_at.into(),
        })
    }
}

fn into_records(models: Vec<seo_analysis::Model>) -> Result<Vec<SeoAnalysisRecord>, RepositoryError> {
    models.into_iter().map(SeoAnalysisRecord::try_from).collect()
}

#[async_trait]
impl SeoAnalysisRepository for SeoAnalysisRepositoryImpl {
    async fn create(&self, record: &SeoAnalysisRecord) -> Result<SeoAnalysisRecord, RepositoryError> {
        let report = record.report.as_ref().map(serde_json::to_value).transpose()?;
        let active_model = seo_analysis::ActiveModel {
            id: Set(record.id),
            user_id: Set(record.user_id),
            url: Set(record.url.clone()),
            title: Set(Some(record.title.clone())),
            meta_description: Set(Some(record.meta_description.clone())),
            h1_tags: Set(Some(serde_json::to_value(&record.h1_tags)?)),
            word_count: Set(Some(record.word_count)),
            analysis_score: Set(Some(record.analysis_score)),
            issues: Set(Some(serde_json::to_value(&record.issues)?)),
            report: Set(report),
            created_at: Set(record.created_at.into()),
        };
        let model = active_model.insert(self.db.as_ref()).await?;
        model.try_into()
    }

    async fn find_recent(
        &self,
        user_id: Uuid,
        url: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<SeoAnalysisRecord>, RepositoryError> {
        seo_analysis::Entity::find()
            .filter(seo_analysis::Column::UserId.eq(user_id))
            .filter(seo_analysis::Column::Url.eq(url))
            .filter(seo_analysis::Column::CreatedAt.gte(since.fixed_offset()))
            .order_by_desc(seo_analysis::Column::CreatedAt)
            .one(self.db.as_ref())
            .await?
            .map(SeoAnalysisRecord::try_from)
            .transpose()
    }

    async fn list_recent(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> Result<Vec<SeoAnalysisRecord>, RepositoryError> {
        let models = seo_analysis::Entity::find()
            .filter(seo_analysis::Column::UserId.eq(user_id))
            .order_by_desc(seo_analysis::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        into_records(models)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepositoryError> {
        let count = seo_analysis::Entity::find()
            .filter(seo_analysis::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }
}
