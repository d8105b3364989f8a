// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::analytics::VideoViewStat;
use crate::domain::models::video::{TranscodeStatus, Video};
use crate::domain::repositories::video_repository::VideoRepository;
use crate::infrastructure::database::entities::video as video_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Alias, Expr},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 视频仓库实现
#[derive(Clone)]
pub struct VideoRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl VideoRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<video_entity::Model> for Video {
    fn from(model: video_entity::Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            title: model.title,
            file_path: model.file_path,
            duration_seconds: model.duration_seconds,
            thumbnail_path: model.thumbnail_path,
            view_count: model.view_count,
            transcode_status: model.transcode_status.parse().unwrap_or_default(),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<Video> for video_entity::ActiveModel {
    fn from(video: Video) -> Self {
        Self {
            id: Set(video.id),
            post_id: Set(video.post_id),
            title: Set(video.title),
            file_path: Set(video.file_path),
            duration_seconds: Set(video.duration_seconds),
            thumbnail_path: Set(video.thumbnail_path),
            view_count: Set(video.view_count),
            transcode_status: Set(video.transcode_status.to_string()),
            created_at: Set(video.created_at.fixed_offset()),
            updated_at: Set(video.updated_at.fixed_offset()),
        }
    }
}

#[async_trait]
impl VideoRepository for VideoRepositoryImpl {
    async fn create(&self, video: &Video) -> Result<Video, RepositoryError> {
        let model: video_entity::ActiveModel = video.clone().into();
        Ok(model.insert(self.db.as_ref()).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, RepositoryError> {
        let model = video_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Video::from))
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Video>, RepositoryError> {
        let models = video_entity::Entity::find()
            .filter(video_entity::Column::PostId.eq(post_id))
            .order_by_asc(video_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Video::from).collect())
    }

    async fn update(&self, video: &Video) -> Result<Video, RepositoryError> {
        let mut model: video_entity::ActiveModel = video.clone().into();
        // 播放数只由观看统计修改
        model.view_count = sea_orm::ActiveValue::NotSet;
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.updated_at = Set(Utc::now().fixed_offset());
        Ok(model.update(self.db.as_ref()).await?.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = video_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn set_transcode_result(
        &self,
        id: Uuid,
        status: TranscodeStatus,
        thumbnail_path: Option<String>,
    ) -> Result<(), RepositoryError> {
        let mut update = video_entity::Entity::update_many()
            .col_expr(
                video_entity::Column::TranscodeStatus,
                Expr::value(status.to_string()),
            )
            .col_expr(
                video_entity::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            );
        if let Some(path) = thumbnail_path {
            update = update.col_expr(video_entity::Column::ThumbnailPath, Expr::value(path));
        }

        let result = update
            .filter(video_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(video_entity::Entity::find().count(self.db.as_ref()).await?)
    }

    async fn total_views(&self) -> Result<i64, RepositoryError> {
        // PostgreSQL 的 SUM(bigint) 返回 numeric，统一转换为 BIGINT
        let total: Option<Option<i64>> = video_entity::Entity::find()
            .select_only()
            .column_as(
                Expr::col(video_entity::Column::ViewCount)
                    .sum()
                    .cast_as(Alias::new("BIGINT")),
                "total",
            )
            .into_tuple()
            .one(self.db.as_ref())
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }

    async fn top_by_views(&self, limit: u64) -> Result<Vec<VideoViewStat>, RepositoryError> {
        let models = video_entity::Entity::find()
            .order_by_desc(video_entity::Column::ViewCount)
            .order_by_asc(video_entity::Column::Title)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models
            .into_iter()
            .map(|model| VideoViewStat {
                video_id: model.id,
                title: model.title,
                view_count: model.view_count,
            })
            .collect())
    }
}
