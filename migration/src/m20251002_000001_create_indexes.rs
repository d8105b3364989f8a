use sea_orm_migration::prelude::*;

use crate::m20251001_000002_create_posts_and_videos::{Posts, Videos};
use crate::m20251001_000003_create_view_tracking::{DailyViewHistories, ViewHistories, ViewLogs};
use crate::m20251001_000004_create_settings_and_transcode_jobs::TranscodeJobs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Session lookup within the dedup window
        manager
            .create_index(
                Index::create()
                    .name("idx_view_logs_video_session_created_at")
                    .table(ViewLogs::Table)
                    .col(ViewLogs::VideoId)
                    .col(ViewLogs::SessionId)
                    .col(ViewLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Retention cleanup scans
        manager
            .create_index(
                Index::create()
                    .name("idx_view_histories_last_watched_at")
                    .table(ViewHistories::Table)
                    .col(ViewHistories::LastWatchedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_daily_view_histories_view_date")
                    .table(DailyViewHistories::Table)
                    .col(DailyViewHistories::ViewDate)
                    .to_owned(),
            )
            .await?;

        // Scheduler scans
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_visibility_scheduled")
                    .table(Posts::Table)
                    .col(Posts::Visibility)
                    .col(Posts::ScheduledPublishAt)
                    .col(Posts::ScheduledUnpublishAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_videos_post_id")
                    .table(Videos::Table)
                    .col(Videos::PostId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transcode_jobs_status")
                    .table(TranscodeJobs::Table)
                    .col(TranscodeJobs::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_transcode_jobs_status",
            "idx_videos_post_id",
            "idx_posts_visibility_scheduled",
            "idx_daily_view_histories_view_date",
            "idx_view_histories_last_watched_at",
            "idx_view_logs_video_session_created_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
