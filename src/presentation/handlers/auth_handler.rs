// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use std::sync::Arc;

use crate::application::dto::auth_dto::{LoginRequestDto, LoginResponseDto};
use crate::application::dto::pagination::PaginationQuery;
use crate::application::dto::user_dto::UserResponseDto;
use crate::domain::models::page::Page;
use crate::domain::models::view::ViewHistory;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::view_tracking_service::ViewTrackingService;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::auth_user::AuthUser;
use crate::presentation::extractors::validated::{ApiQuery, ValidatedJson};

/// 登录并签发令牌
pub async fn login(
    Extension(auth): Extension<Arc<AuthService>>,
    ValidatedJson(payload): ValidatedJson<LoginRequestDto>,
) -> Result<Json<LoginResponseDto>, AppError> {
    let (token, user) = auth.login(&payload.username, &payload.password).await?;
    Ok(Json(LoginResponseDto {
        token,
        user: user.into(),
    }))
}

/// 当前登录用户
pub async fn me(
    Extension(auth): Extension<Arc<AuthService>>,
    AuthUser(current): AuthUser,
) -> Result<Json<UserResponseDto>, AppError> {
    let user = auth.profile(&current).await?;
    Ok(Json(user.into()))
}

/// 当前用户的终身观看历史，最近观看在前
pub async fn my_history(
    Extension(tracking): Extension<Arc<ViewTrackingService>>,
    AuthUser(current): AuthUser,
    ApiQuery(query): ApiQuery<PaginationQuery>,
) -> Result<Json<Page<ViewHistory>>, AppError> {
    let history = tracking.history(current.id, query.into()).await?;
    Ok(Json(history))
}
