// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::application::dto::video_dto::{ThumbnailRequestDto, VideoRequestDto};
use crate::application::dto::view_dto::ViewProgressRequestDto;
use crate::domain::models::transcode_job::TranscodeJob;
use crate::domain::models::user::UserRole;
use crate::domain::models::video::Video;
use crate::domain::models::view::ViewProgressOutcome;
use crate::domain::services::transcode_service::TranscodeService;
use crate::domain::services::video_service::VideoService;
use crate::domain::services::view_tracking_service::ViewTrackingService;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::auth_user::{AuthUser, MaybeAuthUser};
use crate::presentation::extractors::client_info::ClientInfo;
use crate::presentation::extractors::validated::ValidatedJson;

/// 读取视频，所属帖子对调用者不可见时返回 404
pub async fn get_video(
    Extension(videos): Extension<Arc<VideoService>>,
    viewer: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Video>, AppError> {
    Ok(Json(videos.get(viewer.role(), id).await?))
}

pub async fn update_video(
    Extension(videos): Extension<Arc<VideoService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<VideoRequestDto>,
) -> Result<Json<Video>, AppError> {
    user.require(UserRole::Curator)?;
    Ok(Json(videos.update(id, payload.into()).await?))
}

pub async fn delete_video(
    Extension(videos): Extension<Arc<VideoService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require(UserRole::Curator)?;
    videos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 播放进度上报
///
/// 会话指纹由客户端IP与 User-Agent 生成，登录用户额外记录观看历史
///
/// # 参数
///
/// * `id` - 视频ID
/// * `payload` - 累计观看秒数与完成率
///
/// # 返回值
///
/// 是否计入播放数、当前播放数、是否新建会话
pub async fn record_view_progress(
    Extension(videos): Extension<Arc<VideoService>>,
    Extension(tracking): Extension<Arc<ViewTrackingService>>,
    viewer: MaybeAuthUser,
    client: ClientInfo,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ViewProgressRequestDto>,
) -> Result<Json<ViewProgressOutcome>, AppError> {
    videos.get(viewer.role(), id).await?;

    let user_id = viewer.user().map(|user| user.id);
    let progress = payload.into_progress(id, client.fingerprint(), user_id)?;
    debug!(
        "View progress for video {} from {}",
        id,
        client.ip.as_deref().unwrap_or("unknown")
    );

    Ok(Json(tracking.record_view_progress(progress).await?))
}

/// 提交转码任务
pub async fn submit_transcode(
    Extension(transcode): Extension<Arc<TranscodeService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<TranscodeJob>), AppError> {
    user.require(UserRole::Curator)?;
    let job = transcode.submit_transcode(id).await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// 提交缩略图任务，请求体可省略
pub async fn submit_thumbnail(
    Extension(transcode): Extension<Arc<TranscodeService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<ThumbnailRequestDto>>,
) -> Result<(StatusCode, Json<TranscodeJob>), AppError> {
    user.require(UserRole::Curator)?;
    let timestamp = payload.and_then(|Json(body)| body.timestamp);
    let job = transcode.submit_thumbnail(id, timestamp).await?;
    Ok((StatusCode::ACCEPTED, Json(job)))
}

/// 向转码服务刷新任务状态并持久化
pub async fn get_transcode_job(
    Extension(transcode): Extension<Arc<TranscodeService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscodeJob>, AppError> {
    user.require(UserRole::Curator)?;
    Ok(Json(transcode.refresh(id).await?))
}
