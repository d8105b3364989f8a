use sea_orm_migration::prelude::*;

use crate::m20251001_000002_create_posts_and_videos::Videos;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemSettings::Key)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemSettings::Value).text().not_null())
                    .col(ColumnDef::new(SystemSettings::Description).text().null())
                    .col(
                        ColumnDef::new(SystemSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TranscodeJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TranscodeJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TranscodeJobs::VideoId).uuid().not_null())
                    .col(ColumnDef::new(TranscodeJobs::ExternalJobId).string().null())
                    .col(ColumnDef::new(TranscodeJobs::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(TranscodeJobs::Status)
                            .string_len(16)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(TranscodeJobs::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TranscodeJobs::OutputPath).string().null())
                    .col(ColumnDef::new(TranscodeJobs::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(TranscodeJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TranscodeJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transcode_jobs_video")
                            .from(TranscodeJobs::Table, TranscodeJobs::VideoId)
                            .to(Videos::Table, Videos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TranscodeJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SystemSettings {
    Table,
    Key,
    Value,
    Description,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum TranscodeJobs {
    Table,
    Id,
    VideoId,
    ExternalJobId,
    Kind,
    Status,
    Progress,
    OutputPath,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}
