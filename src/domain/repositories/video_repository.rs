// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::analytics::VideoViewStat;
use crate::domain::models::video::{TranscodeStatus, Video};
use async_trait::async_trait;
use uuid::Uuid;

/// 视频仓库特质
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create(&self, video: &Video) -> Result<Video, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, RepositoryError>;
    /// 帖子下的视频，按创建时间升序
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Video>, RepositoryError>;
    async fn update(&self, video: &Video) -> Result<Video, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
    /// 更新转码状态，缩略图路径为 `Some` 时一并写入
    async fn set_transcode_result(
        &self,
        id: Uuid,
        status: TranscodeStatus,
        thumbnail_path: Option<String>,
    ) -> Result<(), RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
    /// 全部视频播放数之和
    async fn total_views(&self) -> Result<i64, RepositoryError>;
    /// 播放数最高的视频
    async fn top_by_views(&self, limit: u64) -> Result<Vec<VideoViewStat>, RepositoryError>;
}
