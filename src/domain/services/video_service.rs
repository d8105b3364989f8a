// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult, RepositoryError};
use crate::domain::models::user::UserRole;
use crate::domain::models::video::{TranscodeStatus, Video};
use crate::domain::repositories::post_repository::PostRepository;
use crate::domain::repositories::video_repository::VideoRepository;
use crate::domain::services::post_service::post_not_found;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 视频的可编辑字段
#[derive(Debug, Clone)]
pub struct VideoInput {
    pub title: String,
    /// 已存储文件的路径
    pub file_path: String,
    pub duration_seconds: Option<f64>,
}

impl VideoInput {
    fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("タイトルを入力してください"));
        }
        if self.file_path.trim().is_empty() {
            return Err(DomainError::validation("ファイルパスを入力してください"));
        }
        if let Some(duration) = self.duration_seconds {
            if !duration.is_finite() || duration < 0.0 {
                return Err(DomainError::validation(
                    "再生時間は 0 以上の数値で指定してください",
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn video_not_found() -> DomainError {
    DomainError::not_found("動画が見つかりません")
}

/// 视频服务
pub struct VideoService {
    videos: Arc<dyn VideoRepository>,
    posts: Arc<dyn PostRepository>,
}

impl VideoService {
    pub fn new(videos: Arc<dyn VideoRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { videos, posts }
    }

    /// 把已存储的视频文件挂到帖子下
    pub async fn attach(&self, post_id: Uuid, input: VideoInput) -> DomainResult<Video> {
        input.validate()?;
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(post_not_found());
        }

        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            post_id,
            title: input.title.trim().to_string(),
            file_path: input.file_path.trim().to_string(),
            duration_seconds: input.duration_seconds,
            thumbnail_path: None,
            view_count: 0,
            transcode_status: TranscodeStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let created = self.videos.create(&video).await?;
        info!("Video {} attached to post {}", created.id, post_id);
        Ok(created)
    }

    /// 读取视频，所属帖子对调用者不可见时按不存在处理
    pub async fn get(&self, viewer: Option<UserRole>, id: Uuid) -> DomainResult<Video> {
        let video = self.find(id).await?;
        let visible = self
            .posts
            .find_by_id(video.post_id)
            .await?
            .is_some_and(|post| post.visibility.visible_to(viewer));
        if !visible {
            return Err(video_not_found());
        }
        Ok(video)
    }

    /// 不做可见性检查的读取
    pub async fn find(&self, id: Uuid) -> DomainResult<Video> {
        self.videos.find_by_id(id).await?.ok_or_else(video_not_found)
    }

    pub async fn update(&self, id: Uuid, input: VideoInput) -> DomainResult<Video> {
        input.validate()?;
        let mut video = self.find(id).await?;
        video.title = input.title.trim().to_string();
        video.file_path = input.file_path.trim().to_string();
        video.duration_seconds = input.duration_seconds;

        self.videos.update(&video).await.map_err(|e| match e {
            RepositoryError::NotFound => video_not_found(),
            other => other.into(),
        })
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !self.videos.delete(id).await? {
            return Err(video_not_found());
        }
        Ok(())
    }
}
