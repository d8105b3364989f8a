// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::pagination::PaginationQuery;
use crate::application::dto::playlist_dto::{AddPlaylistVideoRequestDto, PlaylistRequestDto};
use crate::domain::models::page::Page;
use crate::domain::models::playlist::Playlist;
use crate::domain::services::playlist_service::{PlaylistDetail, PlaylistService};
use crate::presentation::errors::AppError;
use crate::presentation::extractors::auth_user::{AuthUser, MaybeAuthUser};
use crate::presentation::extractors::validated::{ApiQuery, ValidatedJson};

/// 播放列表，公开列表对所有人可见，私有列表仅所有者和管理角色可见
pub async fn list_playlists(
    Extension(playlists): Extension<Arc<PlaylistService>>,
    viewer: MaybeAuthUser,
    ApiQuery(query): ApiQuery<PaginationQuery>,
) -> Result<Json<Page<Playlist>>, AppError> {
    Ok(Json(playlists.list(viewer.user(), query.into()).await?))
}

pub async fn get_playlist(
    Extension(playlists): Extension<Arc<PlaylistService>>,
    viewer: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaylistDetail>, AppError> {
    Ok(Json(playlists.get(viewer.user(), id).await?))
}

pub async fn create_playlist(
    Extension(playlists): Extension<Arc<PlaylistService>>,
    AuthUser(actor): AuthUser,
    ValidatedJson(payload): ValidatedJson<PlaylistRequestDto>,
) -> Result<(StatusCode, Json<Playlist>), AppError> {
    let playlist = playlists.create(&actor, payload.try_into()?).await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

pub async fn update_playlist(
    Extension(playlists): Extension<Arc<PlaylistService>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PlaylistRequestDto>,
) -> Result<Json<Playlist>, AppError> {
    Ok(Json(playlists.update(&actor, id, payload.try_into()?).await?))
}

pub async fn delete_playlist(
    Extension(playlists): Extension<Arc<PlaylistService>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    playlists.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 添加视频，未指定位置时追加到末尾
pub async fn add_playlist_video(
    Extension(playlists): Extension<Arc<PlaylistService>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddPlaylistVideoRequestDto>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let position = playlists
        .add_video(&actor, id, payload.video_id, payload.position)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "playlist_id": id, "video_id": payload.video_id, "position": position })),
    ))
}

pub async fn remove_playlist_video(
    Extension(playlists): Extension<Arc<PlaylistService>>,
    AuthUser(actor): AuthUser,
    Path((id, video_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    playlists.remove_video(&actor, id, video_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
