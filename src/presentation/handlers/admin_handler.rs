// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::application::dto::admin_dto::{AnalyticsQuery, CleanupRequestDto, UpdateSettingRequestDto};
use crate::domain::models::analytics::AnalyticsOverview;
use crate::domain::models::setting::SystemSetting;
use crate::domain::models::user::UserRole;
use crate::domain::models::view::CleanupReport;
use crate::domain::services::analytics_service::{AnalyticsService, VideoAnalytics};
use crate::domain::services::retention_service::RetentionService;
use crate::domain::services::settings_service::SettingsService;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::auth_user::AuthUser;
use crate::presentation::extractors::validated::{ApiQuery, ValidatedJson};

/// 全站统计概览：用户、帖子、视频总数，播放数排行与最近 N 天的每日观看
pub async fn analytics_overview(
    Extension(analytics): Extension<Arc<AnalyticsService>>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<AnalyticsQuery>,
) -> Result<Json<AnalyticsOverview>, AppError> {
    user.require(UserRole::Admin)?;
    Ok(Json(analytics.overview(query.days).await?))
}

pub async fn video_analytics(
    Extension(analytics): Extension<Arc<AnalyticsService>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    ApiQuery(query): ApiQuery<AnalyticsQuery>,
) -> Result<Json<VideoAnalytics>, AppError> {
    user.require(UserRole::Admin)?;
    Ok(Json(analytics.video(id, query.days).await?))
}

pub async fn list_settings(
    Extension(settings): Extension<Arc<SettingsService>>,
    user: AuthUser,
) -> Result<Json<Vec<SystemSetting>>, AppError> {
    user.require(UserRole::Admin)?;
    Ok(Json(settings.list().await?))
}

pub async fn update_setting(
    Extension(settings): Extension<Arc<SettingsService>>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateSettingRequestDto>,
) -> Result<Json<SystemSetting>, AppError> {
    let actor = user.require(UserRole::Admin)?;
    let saved = settings
        .update(&payload.key, &payload.value, payload.description.as_deref())
        .await?;
    info!("Setting {} updated by {}", saved.key, actor.username);
    Ok(Json(saved))
}

/// 手动触发观看历史清理
pub async fn cleanup_view_history(
    Extension(retention): Extension<Arc<RetentionService>>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<CleanupRequestDto>,
) -> Result<Json<CleanupReport>, AppError> {
    let actor = user.require(UserRole::Admin)?;
    let target = query.target()?;
    info!("Retention cleanup of {} requested by {}", target, actor.username);
    Ok(Json(retention.cleanup(target, query.retention_days).await?))
}
