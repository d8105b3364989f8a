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

use crate::application::dto::taxonomy_dto::{CategoryRequestDto, TagRequestDto};
use crate::domain::models::taxonomy::{Category, Tag};
use crate::domain::models::user::UserRole;
use crate::domain::services::taxonomy_service::TaxonomyService;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::auth_user::AuthUser;
use crate::presentation::extractors::validated::ValidatedJson;

/// 分类列表，按排序值升序
pub async fn list_categories(
    Extension(taxonomy): Extension<Arc<TaxonomyService>>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(taxonomy.list_categories().await?))
}

pub async fn create_category(
    Extension(taxonomy): Extension<Arc<TaxonomyService>>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CategoryRequestDto>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    user.require(UserRole::Curator)?;
    let category = taxonomy.create_category(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    Extension(taxonomy): Extension<Arc<TaxonomyService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CategoryRequestDto>,
) -> Result<Json<Category>, AppError> {
    user.require(UserRole::Curator)?;
    Ok(Json(taxonomy.update_category(id, payload.into()).await?))
}

pub async fn delete_category(
    Extension(taxonomy): Extension<Arc<TaxonomyService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require(UserRole::Curator)?;
    taxonomy.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tags(
    Extension(taxonomy): Extension<Arc<TaxonomyService>>,
) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(taxonomy.list_tags().await?))
}

pub async fn create_tag(
    Extension(taxonomy): Extension<Arc<TaxonomyService>>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<TagRequestDto>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    user.require(UserRole::Curator)?;
    let tag = taxonomy.create_tag(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn delete_tag(
    Extension(taxonomy): Extension<Arc<TaxonomyService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    user.require(UserRole::Curator)?;
    taxonomy.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
