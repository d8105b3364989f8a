// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::page::PageRequest;
use crate::domain::models::playlist::{Playlist, PlaylistEntry};
use crate::domain::models::post::Visibility;
use async_trait::async_trait;
use uuid::Uuid;

/// 播放列表可见范围
#[derive(Debug, Clone, Copy)]
pub enum PlaylistScope {
    /// 全部播放列表
    All,
    /// 公开的播放列表以及该用户自己的播放列表
    PublicOrOwnedBy(Uuid),
    /// 仅公开的播放列表
    PublicOnly,
}

/// 播放列表仓库特质
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn create(&self, playlist: &Playlist) -> Result<Playlist, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>, RepositoryError>;
    async fn list(
        &self,
        scope: PlaylistScope,
        page: PageRequest,
    ) -> Result<(Vec<Playlist>, u64), RepositoryError>;
    async fn update(&self, playlist: &Playlist) -> Result<Playlist, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
    /// 向播放列表添加视频
    ///
    /// # 参数
    ///
    /// * `position` - 插入位置，`None` 时追加到末尾；插入点之后的项顺延
    ///
    /// # 返回值
    ///
    /// 视频的最终位置；视频已在列表中时返回 `Conflict`
    async fn add_video(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        position: Option<i32>,
    ) -> Result<i32, RepositoryError>;
    /// 移除视频并压缩后续位置
    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid)
        -> Result<bool, RepositoryError>;
    /// 列表中的视频，按位置升序；`visibility` 非空时仅返回所属帖子满足该可见性的视频
    async fn entries(
        &self,
        playlist_id: Uuid,
        visibility: Option<Visibility>,
    ) -> Result<Vec<PlaylistEntry>, RepositoryError>;
}
