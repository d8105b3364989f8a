// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::transcode_job::{TranscodeJob, TranscodeKind};
use crate::domain::models::video::TranscodeStatus;
use crate::domain::repositories::transcode_job_repository::TranscodeJobRepository;
use crate::infrastructure::database::entities::transcode_job as job_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 转码任务仓库实现
#[derive(Clone)]
pub struct TranscodeJobRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TranscodeJobRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for TranscodeJob {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            video_id: model.video_id,
            external_job_id: model.external_job_id,
            kind: model.kind.parse().unwrap_or(TranscodeKind::Transcode),
            status: model.status.parse().unwrap_or_default(),
            progress: model.progress,
            output_path: model.output_path,
            error_message: model.error_message,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<TranscodeJob> for job_entity::ActiveModel {
    fn from(job: TranscodeJob) -> Self {
        Self {
            id: Set(job.id),
            video_id: Set(job.video_id),
            external_job_id: Set(job.external_job_id),
            kind: Set(job.kind.to_string()),
            status: Set(job.status.to_string()),
            progress: Set(job.progress),
            output_path: Set(job.output_path),
            error_message: Set(job.error_message),
            created_at: Set(job.created_at.fixed_offset()),
            updated_at: Set(job.updated_at.fixed_offset()),
        }
    }
}

#[async_trait]
impl TranscodeJobRepository for TranscodeJobRepositoryImpl {
    async fn create(&self, job: &TranscodeJob) -> Result<TranscodeJob, RepositoryError> {
        let model: job_entity::ActiveModel = job.clone().into();
        Ok(model.insert(self.db.as_ref()).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TranscodeJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(TranscodeJob::from))
    }

    async fn update(&self, job: &TranscodeJob) -> Result<TranscodeJob, RepositoryError> {
        let mut model: job_entity::ActiveModel = job.clone().into();
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.updated_at = Set(Utc::now().fixed_offset());
        Ok(model.update(self.db.as_ref()).await?.into())
    }

    async fn list_in_flight(&self, limit: u64) -> Result<Vec<TranscodeJob>, RepositoryError> {
        let models = job_entity::Entity::find()
            .filter(job_entity::Column::Status.is_in([
                TranscodeStatus::Pending.to_string(),
                TranscodeStatus::Processing.to_string(),
            ]))
            .filter(job_entity::Column::ExternalJobId.is_not_null())
            .order_by_asc(job_entity::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(TranscodeJob::from).collect())
    }
}
