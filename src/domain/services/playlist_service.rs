// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult, RepositoryError};
use crate::domain::models::page::{Page, PageRequest};
use crate::domain::models::playlist::{Playlist, PlaylistEntry};
use crate::domain::models::post::Visibility;
use crate::domain::models::user::CurrentUser;
use crate::domain::repositories::playlist_repository::{PlaylistRepository, PlaylistScope};
use crate::domain::repositories::video_repository::VideoRepository;
use crate::domain::services::video_service::video_not_found;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// 播放列表的可编辑字段
#[derive(Debug, Clone)]
pub struct PlaylistInput {
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
}

/// 播放列表详情
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub entries: Vec<PlaylistEntry>,
}

fn playlist_not_found() -> DomainError {
    DomainError::not_found("プレイリストが見つかりません")
}

/// 播放列表服务
///
/// 可见性规则与帖子相同，另外创建者总能看到并编辑自己的播放列表
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistRepository>,
    videos: Arc<dyn VideoRepository>,
}

impl PlaylistService {
    pub fn new(playlists: Arc<dyn PlaylistRepository>, videos: Arc<dyn VideoRepository>) -> Self {
        Self { playlists, videos }
    }

    fn can_view(viewer: Option<&CurrentUser>, playlist: &Playlist) -> bool {
        playlist.visibility.visible_to(viewer.map(|u| u.role))
            || viewer.is_some_and(|u| u.id == playlist.creator_id)
    }

    fn can_edit(actor: &CurrentUser, playlist: &Playlist) -> bool {
        actor.id == playlist.creator_id || actor.role.can_manage_content()
    }

    pub async fn list(
        &self,
        viewer: Option<&CurrentUser>,
        page: PageRequest,
    ) -> DomainResult<Page<Playlist>> {
        let scope = match viewer {
            Some(user) if user.role.can_manage_content() => PlaylistScope::All,
            Some(user) => PlaylistScope::PublicOrOwnedBy(user.id),
            None => PlaylistScope::PublicOnly,
        };
        let (items, total) = self.playlists.list(scope, page).await?;
        Ok(Page::new(items, total, page))
    }

    /// 读取播放列表及条目
    ///
    /// 非内容管理员只能看到公开帖子下的视频
    pub async fn get(&self, viewer: Option<&CurrentUser>, id: Uuid) -> DomainResult<PlaylistDetail> {
        let playlist = self
            .playlists
            .find_by_id(id)
            .await?
            .filter(|playlist| Self::can_view(viewer, playlist))
            .ok_or_else(playlist_not_found)?;

        let video_filter = match viewer {
            Some(user) if user.role.can_manage_content() => None,
            _ => Some(Visibility::Public),
        };
        let entries = self.playlists.entries(id, video_filter).await?;
        Ok(PlaylistDetail { playlist, entries })
    }

    /// 读取并确认调用者有编辑权限
    async fn editable(&self, actor: &CurrentUser, id: Uuid) -> DomainResult<Playlist> {
        let playlist = self
            .playlists
            .find_by_id(id)
            .await?
            .ok_or_else(playlist_not_found)?;
        if !Self::can_edit(actor, &playlist) {
            return Err(DomainError::forbidden());
        }
        Ok(playlist)
    }

    pub async fn create(&self, actor: &CurrentUser, input: PlaylistInput) -> DomainResult<Playlist> {
        validate(&input)?;
        let now = Utc::now();
        let playlist = Playlist {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description,
            visibility: input.visibility,
            creator_id: actor.id,
            created_at: now,
            updated_at: now,
        };
        Ok(self.playlists.create(&playlist).await?)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        input: PlaylistInput,
    ) -> DomainResult<Playlist> {
        validate(&input)?;
        let mut playlist = self.editable(actor, id).await?;
        playlist.title = input.title.trim().to_string();
        playlist.description = input.description;
        playlist.visibility = input.visibility;

        self.playlists.update(&playlist).await.map_err(|e| match e {
            RepositoryError::NotFound => playlist_not_found(),
            other => other.into(),
        })
    }

    pub async fn delete(&self, actor: &CurrentUser, id: Uuid) -> DomainResult<()> {
        self.editable(actor, id).await?;
        if !self.playlists.delete(id).await? {
            return Err(playlist_not_found());
        }
        Ok(())
    }

    /// 追加视频，`position` 为空时放在末尾
    ///
    /// # 返回值
    ///
    /// * `Ok(i32)` - 实际插入的位置（从 0 开始）
    /// * `Err(DomainError::Conflict)` - 视频已在列表中
    pub async fn add_video(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        video_id: Uuid,
        position: Option<i32>,
    ) -> DomainResult<i32> {
        self.editable(actor, id).await?;
        if self.videos.find_by_id(video_id).await?.is_none() {
            return Err(video_not_found());
        }

        self.playlists
            .add_video(id, video_id, position)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    DomainError::conflict("この動画は既にプレイリストに追加されています")
                }
                other => other.into(),
            })
    }

    pub async fn remove_video(&self, actor: &CurrentUser, id: Uuid, video_id: Uuid) -> DomainResult<()> {
        self.editable(actor, id).await?;
        if !self.playlists.remove_video(id, video_id).await? {
            return Err(DomainError::not_found(
                "この動画はプレイリストに含まれていません",
            ));
        }
        Ok(())
    }
}

fn validate(input: &PlaylistInput) -> DomainResult<()> {
    if input.title.trim().is_empty() {
        return Err(DomainError::validation("タイトルを入力してください"));
    }
    Ok(())
}
