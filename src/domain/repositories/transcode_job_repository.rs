// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::transcode_job::TranscodeJob;
use async_trait::async_trait;
use uuid::Uuid;

/// 转码任务仓库特质
#[async_trait]
pub trait TranscodeJobRepository: Send + Sync {
    async fn create(&self, job: &TranscodeJob) -> Result<TranscodeJob, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TranscodeJob>, RepositoryError>;
    async fn update(&self, job: &TranscodeJob) -> Result<TranscodeJob, RepositoryError>;
    /// 仍处于 PENDING/PROCESSING 且已拿到外部任务ID的任务，最早创建的在前
    async fn list_in_flight(&self, limit: u64) -> Result<Vec<TranscodeJob>, RepositoryError>;
}
