// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::application::dto::admin_dto::CleanupRequestDto;
use crate::domain::models::view::CleanupReport;
use crate::domain::services::publish_scheduler_service::{PublishSchedulerService, ScheduleReport};
use crate::domain::services::retention_service::RetentionService;
use crate::presentation::errors::AppError;
use crate::presentation::extractors::validated::ApiQuery;

/// 外部定时器触发的排期发布
pub async fn publish_scheduled(
    Extension(scheduler): Extension<Arc<PublishSchedulerService>>,
) -> Result<Json<ScheduleReport>, AppError> {
    Ok(Json(scheduler.run_scheduled_transitions(Utc::now()).await?))
}

/// 外部定时器触发的保留清理
pub async fn cleanup_view_history(
    Extension(retention): Extension<Arc<RetentionService>>,
    ApiQuery(query): ApiQuery<CleanupRequestDto>,
) -> Result<Json<CleanupReport>, AppError> {
    let target = query.target()?;
    Ok(Json(retention.cleanup(target, query.retention_days).await?))
}
