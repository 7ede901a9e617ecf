// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rankings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub keyword_id: Uuid,
    pub position: Option<i32>,
    pub url: Option<String>,
    pub checked_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tracked_keyword::Entity",
        from = "Column::KeywordId",
        to = "super::tracked_keyword::Column::Id",
        on_delete = "Cascade"
    )]
    TrackedKeyword,
}

impl Related<super::tracked_keyword::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackedKeyword.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
