use sea_orm_migration::prelude::*;

use crate::m20251001_000001_create_users_and_taxonomy::Users;
use crate::m20251001_000002_create_posts_and_videos::Videos;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Raw per-session progress log, also carries the counted flag
        manager
            .create_table(
                Table::create()
                    .table(ViewLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViewLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ViewLogs::VideoId).uuid().not_null())
                    .col(ColumnDef::new(ViewLogs::UserId).uuid().null())
                    .col(ColumnDef::new(ViewLogs::SessionId).string().not_null())
                    .col(
                        ColumnDef::new(ViewLogs::WatchDuration)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ViewLogs::CompletionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ViewLogs::ViewCountUpdated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ViewLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ViewLogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_view_logs_video")
                            .from(ViewLogs::Table, ViewLogs::VideoId)
                            .to(Videos::Table, Videos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_view_logs_user")
                            .from(ViewLogs::Table, ViewLogs::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ViewHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViewHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ViewHistories::UserId).uuid().not_null())
                    .col(ColumnDef::new(ViewHistories::VideoId).uuid().not_null())
                    .col(
                        ColumnDef::new(ViewHistories::TotalWatchTime)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ViewHistories::CompletionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ViewHistories::LastWatchedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ViewHistories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_view_histories_user")
                            .from(ViewHistories::Table, ViewHistories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_view_histories_video")
                            .from(ViewHistories::Table, ViewHistories::VideoId)
                            .to(Videos::Table, Videos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_view_histories_user_video")
                    .table(ViewHistories::Table)
                    .col(ViewHistories::UserId)
                    .col(ViewHistories::VideoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailyViewHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyViewHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DailyViewHistories::UserId).uuid().not_null())
                    .col(ColumnDef::new(DailyViewHistories::VideoId).uuid().not_null())
                    .col(ColumnDef::new(DailyViewHistories::ViewDate).date().not_null())
                    .col(
                        ColumnDef::new(DailyViewHistories::WatchDuration)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DailyViewHistories::CompletionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(DailyViewHistories::SessionCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(DailyViewHistories::FirstWatchedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DailyViewHistories::LastWatchedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_view_histories_user")
                            .from(DailyViewHistories::Table, DailyViewHistories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_view_histories_video")
                            .from(DailyViewHistories::Table, DailyViewHistories::VideoId)
                            .to(Videos::Table, Videos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_daily_view_histories_user_video_date")
                    .table(DailyViewHistories::Table)
                    .col(DailyViewHistories::UserId)
                    .col(DailyViewHistories::VideoId)
                    .col(DailyViewHistories::ViewDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyViewHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ViewHistories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ViewLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ViewLogs {
    Table,
    Id,
    VideoId,
    UserId,
    SessionId,
    WatchDuration,
    CompletionRate,
    ViewCountUpdated,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ViewHistories {
    Table,
    Id,
    UserId,
    VideoId,
    TotalWatchTime,
    CompletionRate,
    LastWatchedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum DailyViewHistories {
    Table,
    Id,
    UserId,
    VideoId,
    ViewDate,
    WatchDuration,
    CompletionRate,
    SessionCount,
    FirstWatchedAt,
    LastWatchedAt,
}
