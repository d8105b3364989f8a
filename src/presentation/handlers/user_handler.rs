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

use crate::application::dto::pagination::PaginationQuery;
use crate::application::dto::user_dto::{
    CreateUserRequestDto, UpdateUserRequestDto, UserResponseDto,
};
use crate::domain::models::page::Page;
use crate::domain::models::user::UserRole;
use crate::domain::services::user_service::UserService;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::auth_user::AuthUser;
use crate::presentation::extractors::validated::{ApiQuery, ValidatedJson};

pub async fn list_users(
    Extension(users): Extension<Arc<UserService>>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<PaginationQuery>,
) -> Result<Json<Page<UserResponseDto>>, AppError> {
    user.require(UserRole::Admin)?;
    let page = users.list(query.into()).await?;
    Ok(Json(page.map(UserResponseDto::from)))
}

pub async fn create_user(
    Extension(users): Extension<Arc<UserService>>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateUserRequestDto>,
) -> Result<(StatusCode, Json<UserResponseDto>), AppError> {
    user.require(UserRole::Admin)?;
    let created = users.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get_user(
    Extension(users): Extension<Arc<UserService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponseDto>, AppError> {
    user.require(UserRole::Admin)?;
    Ok(Json(users.get(id).await?.into()))
}

/// 更新显示名、角色、密码或启用状态
pub async fn update_user(
    Extension(users): Extension<Arc<UserService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequestDto>,
) -> Result<Json<UserResponseDto>, AppError> {
    user.require(UserRole::Admin)?;
    let updated = users.update(id, payload.into()).await?;
    Ok(Json(updated.into()))
}

/// 删除用户，不能删除自己
pub async fn delete_user(
    Extension(users): Extension<Arc<UserService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = user.require(UserRole::Admin)?;
    users.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
