// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    #[sea_orm(unique)]
    pub google_id: Option<String>,
    pub plan: String,
    pub trial_end: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub subscription_status: String,
    pub current_period_end: Option<DateTimeWithTimeZone>,
    pub daily_keyword_queries: i32,
    pub daily_seo_reports: i32,
    pub last_usage_reset: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tracked_keyword::Entity")]
    TrackedKeywords,
    #[sea_orm(has_many = "super::seo_analysis::Entity")]
    SeoAnalyses,
    #[sea_orm(has_many = "super::api_token::Entity")]
    ApiTokens,
}

impl Related<super::tracked_keyword::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackedKeywords.def()
    }
}

impl Related<super::seo_analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeoAnalyses.def()
    }
}

impl Related<super::api_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
