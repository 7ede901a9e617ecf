use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SeoAnalyses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeoAnalyses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SeoAnalyses::UserId).uuid().not_null())
                    .col(ColumnDef::new(SeoAnalyses::Url).string_len(500).not_null())
                    .col(ColumnDef::new(SeoAnalyses::Title).string_len(255).null())
                    .col(ColumnDef::new(SeoAnalyses::MetaDescription).text().null())
                    .col(ColumnDef::new(SeoAnalyses::H1Tags).json().null())
                    .col(ColumnDef::new(SeoAnalyses::WordCount).integer().null())
                    .col(ColumnDef::new(SeoAnalyses::AnalysisScore).integer().null())
                    .col(ColumnDef::new(SeoAnalyses::Issues).json().null())
                    .col(ColumnDef::new(SeoAnalyses::Report).json().null())
                    .col(
                        ColumnDef::new(SeoAnalyses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seo_analyses_user")
                            .from(SeoAnalyses::Table, SeoAnalyses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seo_analyses_user_url")
                    .table(SeoAnalyses::Table)
                    .col(SeoAnalyses::UserId)
                    .col(SeoAnalyses::Url)
                    .col(SeoAnalyses::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SeoAnalyses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SeoAnalyses {
    Table,
    Id,
    UserId,
    Url,
    Title,
    MetaDescription,
    H1Tags,
    WordCount,
    AnalysisScore,
    Issues,
    Report,
    CreatedAt,
}
