use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tracked_keywords table
        manager
            .create_table(
                Table::create()
                    .table(TrackedKeywords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrackedKeywords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TrackedKeywords::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(TrackedKeywords::Keyword)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackedKeywords::Domain)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TrackedKeywords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tracked_keywords_user")
                            .from(TrackedKeywords::Table, TrackedKeywords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rankings table
        manager
            .create_table(
                Table::create()
                    .table(Rankings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rankings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rankings::KeywordId).uuid().not_null())
                    .col(ColumnDef::new(Rankings::Position).integer().null())
                    .col(ColumnDef::new(Rankings::Url).string_len(500).null())
                    .col(
                        ColumnDef::new(Rankings::CheckedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rankings_keyword")
                            .from(Rankings::Table, Rankings::KeywordId)
                            .to(TrackedKeywords::Table, TrackedKeywords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_tracked_keywords_user")
                    .table(TrackedKeywords::Table)
                    .col(TrackedKeywords::UserId)
                    .col(TrackedKeywords::Keyword)
                    .col(TrackedKeywords::Domain)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rankings_keyword_checked")
                    .table(Rankings::Table)
                    .col(Rankings::KeywordId)
                    .col(Rankings::CheckedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rankings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TrackedKeywords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TrackedKeywords {
    Table,
    Id,
    UserId,
    Keyword,
    Domain,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rankings {
    Table,
    Id,
    KeywordId,
    Position,
    Url,
    CheckedAt,
}
