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
use uuid::Uuid;

use crate::application::dto::post_dto::{PostListQuery, PostRequestDto};
use crate::application::dto::video_dto::VideoRequestDto;
use crate::domain::models::page::Page;
use crate::domain::models::post::Post;
use crate::domain::models::user::UserRole;
use crate::domain::models::video::Video;
use crate::domain::services::post_service::{PostDetail, PostService};
use crate::domain::services::video_service::VideoService;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::auth_user::{AuthUser, MaybeAuthUser};
use crate::presentation::extractors::validated::{ApiQuery, ValidatedJson};

/// 帖子列表
///
/// 匿名用户和普通观众只能看到公开帖子，`visibility` 过滤仅对管理角色生效
pub async fn list_posts(
    Extension(posts): Extension<Arc<PostService>>,
    viewer: MaybeAuthUser,
    ApiQuery(query): ApiQuery<PostListQuery>,
) -> Result<Json<Page<Post>>, AppError> {
    let filter = query.filter()?;
    let page = posts
        .list(viewer.role(), filter, query.page_request())
        .await?;
    Ok(Json(page))
}

/// 按 slug 读取帖子，对调用者不可见时返回 404
pub async fn get_post(
    Extension(posts): Extension<Arc<PostService>>,
    viewer: MaybeAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, AppError> {
    Ok(Json(posts.get_by_slug(viewer.role(), &slug).await?))
}

pub async fn create_post(
    Extension(posts): Extension<Arc<PostService>>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<PostRequestDto>,
) -> Result<(StatusCode, Json<PostDetail>), AppError> {
    let actor = user.require(UserRole::Curator)?;
    let created = posts.create(actor, payload.try_into()?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// 整体替换帖子内容、标签与排期
pub async fn update_post(
    Extension(posts): Extension<Arc<PostService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PostRequestDto>,
) -> Result<Json<PostDetail>, AppError> {
    user.require(UserRole::Curator)?;
    Ok(Json(posts.update(id, payload.try_into()?).await?))
}

pub async fn delete_post(
    Extension(posts): Extension<Arc<PostService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require(UserRole::Curator)?;
    posts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 把已存储的视频文件挂到帖子下
pub async fn attach_video(
    Extension(videos): Extension<Arc<VideoService>>,
    user: AuthUser,
    Path(post_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<VideoRequestDto>,
) -> Result<(StatusCode, Json<Video>), AppError> {
    user.require(UserRole::Curator)?;
    let video = videos.attach(post_id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(video)))
}
