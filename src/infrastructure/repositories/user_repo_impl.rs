// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{prelude::DateTimeWithTimeZone, sea_query::Expr, *};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::plan::{Feature, Plan, SubscriptionStatus};
use crate::domain::models::user::User;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::database::entities::user;
use crate::utils::errors::RepositoryError;

/// 用户仓库实现
#[derive(Clone)]
pub struct UserRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            password_hash: model.password_hash,
            google_id: model.google_id,
            plan: Plan::from_stored(&model.plan),
            trial_end: model.trial_end.map(Into::into),
            is_active: model.is_active,
            stripe_customer_id: model.stripe_customer_id,
            stripe_subscription_id: model.stripe_subscription_id,
            subscription_status: SubscriptionStatus::from_stored(&model.subscription_status),
            current_period_end: model.current_period_end.map(Into::into),
            daily_keyword_queries: model.daily_keyword_queries,
            daily_seo_reports: model.daily_seo_reports,
            last_usage_reset: model.last_usage_reset,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<&User> for user::ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: Set(user.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password_hash: Set(user.password_hash.clone()),
            google_id: Set(user.google_id.clone()),
            plan: Set(user.plan.as_str().to_string()),
            trial_end: Set(user.trial_end.map(Into::into)),
            is_active: Set(user.is_active),
            stripe_customer_id: Set(user.stripe_customer_id.clone()),
            stripe_subscription_id: Set(user.stripe_subscription_id.clone()),
            subscription_status: Set(user.subscription_status.as_str().to_string()),
            current_period_end: Set(user.current_period_end.map(Into::into)),
            daily_keyword_queries: Set(user.daily_keyword_queries),
            daily_seo_reports: Set(user.daily_seo_reports),
            last_usage_reset: Set(user.last_usage_reset),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let model = user::ActiveModel::from(user)
            .insert(self.db.as_ref())
            .await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let model = user::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let model = user::Entity::find()
            .filter(user::Column::StripeCustomerId.eq(customer_id))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let mut active = user::ActiveModel::from(user);
        active.updated_at = Set(Utc::now().into());

        match active.update(self.db.as_ref()).await {
            Ok(model) => Ok(model.into()),
            Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn increment_usage(&self, user_id: Uuid, feature: Feature) -> Result<(), RepositoryError> {
        let column = match feature {
            Feature::KeywordQueries => user::Column::DailyKeywordQueries,
            Feature::SeoReports => user::Column::DailySeoReports,
            // Counted from the keyword table
            Feature::TrackedKeywords => return Ok(()),
        };
        let now: DateTimeWithTimeZone = Utc::now().into();

        let result = user::Entity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn reset_usage(&self, user_id: Uuid, today: NaiveDate) -> Result<(), RepositoryError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        user::Entity::update_many()
            .col_expr(user::Column::DailyKeywordQueries, Expr::value(0))
            .col_expr(user::Column::DailySeoReports, Expr::value(0))
            .col_expr(user::Column::LastUsageReset, Expr::value(today))
            .col_expr(user::Column::UpdatedAt, Expr::value(now))
            .filter(user::Column::Id.eq(user_id))
            .filter(user::Column::LastUsageReset.ne(today))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
