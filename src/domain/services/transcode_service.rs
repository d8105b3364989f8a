// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::transcode_job::{TranscodeJob, TranscodeKind};
use crate::domain::models::video::{TranscodeStatus, Video};
use crate::domain::repositories::transcode_job_repository::TranscodeJobRepository;
use crate::domain::repositories::video_repository::VideoRepository;
use crate::domain::services::transcoder::{
    JobStatusReport, ThumbnailRequest, TranscodeRequest, TranscoderClient, TranscoderError,
};
use crate::domain::services::video_service::video_not_found;
use crate::infrastructure::metrics::TRANSCODER_REQUESTS_TOTAL;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 未指定截取位置时使用的缩略图时间点（秒）
const DEFAULT_THUMBNAIL_SECONDS: f64 = 1.0;

fn upstream(err: &TranscoderError) -> DomainError {
    error!("Transcoder call failed: {}", err);
    DomainError::Upstream("変換サーバーとの通信に失敗しました".to_string())
}

/// 转码编排服务
///
/// 向 GPU 转码服务提交任务，并把任务状态同步回视频
pub struct TranscodeService {
    jobs: Arc<dyn TranscodeJobRepository>,
    videos: Arc<dyn VideoRepository>,
    client: Arc<dyn TranscoderClient>,
    output_dir: String,
}

impl TranscodeService {
    pub fn new(
        jobs: Arc<dyn TranscodeJobRepository>,
        videos: Arc<dyn VideoRepository>,
        client: Arc<dyn TranscoderClient>,
        output_dir: impl Into<String>,
    ) -> Self {
        Self {
            jobs,
            videos,
            client,
            output_dir: output_dir.into(),
        }
    }

    async fn video(&self, video_id: Uuid) -> DomainResult<Video> {
        self.videos
            .find_by_id(video_id)
            .await?
            .ok_or_else(video_not_found)
    }

    /// 提交结果落库；提交失败的任务以 FAILED 状态保存后再返回错误
    async fn record_submission(
        &self,
        video_id: Uuid,
        kind: TranscodeKind,
        submitted: Result<String, TranscoderError>,
    ) -> DomainResult<TranscodeJob> {
        counter!(TRANSCODER_REQUESTS_TOTAL, "operation" => "submit").increment(1);
        let now = Utc::now();
        let mut job = TranscodeJob {
            id: Uuid::new_v4(),
            video_id,
            external_job_id: None,
            kind,
            status: TranscodeStatus::Pending,
            progress: 0,
            output_path: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };

        match submitted {
            Ok(external_id) => {
                job.external_job_id = Some(external_id);
                let job = self.jobs.create(&job).await?;
                if kind == TranscodeKind::Transcode {
                    self.videos
                        .set_transcode_result(video_id, TranscodeStatus::Processing, None)
                        .await?;
                }
                info!(
                    "{} job {} submitted for video {}",
                    kind,
                    job.external_job_id.as_deref().unwrap_or_default(),
                    video_id
                );
                Ok(job)
            }
            Err(e) => {
                job.status = TranscodeStatus::Failed;
                job.error_message = Some(e.to_string());
                self.jobs.create(&job).await?;
                Err(upstream(&e))
            }
        }
    }

    /// 提交转码任务
    pub async fn submit_transcode(&self, video_id: Uuid) -> DomainResult<TranscodeJob> {
        let video = self.video(video_id).await?;
        let request = TranscodeRequest {
            video_id,
            input_path: video.file_path,
            output_dir: format!("{}/{}", self.output_dir.trim_end_matches('/'), video_id),
        };
        let submitted = self.client.submit_transcode(&request).await;
        self.record_submission(video_id, TranscodeKind::Transcode, submitted)
            .await
    }

    /// 提交缩略图任务
    ///
    /// # 参数
    ///
    /// * `video_id` - 视频ID
    /// * `timestamp` - 截取位置（秒），不能超过视频时长
    pub async fn submit_thumbnail(
        &self,
        video_id: Uuid,
        timestamp: Option<f64>,
    ) -> DomainResult<TranscodeJob> {
        let video = self.video(video_id).await?;
        let timestamp = timestamp.unwrap_or(DEFAULT_THUMBNAIL_SECONDS);
        let beyond_end = video.duration_seconds.is_some_and(|d| timestamp > d);
        if !timestamp.is_finite() || timestamp < 0.0 || beyond_end {
            return Err(DomainError::validation(
                "サムネイルの位置が動画の範囲外です",
            ));
        }

        let request = ThumbnailRequest {
            video_id,
            input_path: video.file_path,
            timestamp,
        };
        let submitted = self.client.submit_thumbnail(&request).await;
        self.record_submission(video_id, TranscodeKind::Thumbnail, submitted)
            .await
    }

    /// 从转码服务刷新任务状态并持久化
    ///
    /// 已结束或未成功提交的任务原样返回
    pub async fn refresh(&self, job_id: Uuid) -> DomainResult<TranscodeJob> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| DomainError::not_found("変換ジョブが見つかりません"))?;
        if !job.status.is_in_flight() {
            return Ok(job);
        }
        let Some(external_id) = job.external_job_id.clone() else {
            return Ok(job);
        };

        counter!(TRANSCODER_REQUESTS_TOTAL, "operation" => "status").increment(1);
        let report = self
            .client
            .job_status(&external_id)
            .await
            .map_err(|e| upstream(&e))?;
        self.apply_report(job, report).await
    }

    async fn apply_report(
        &self,
        mut job: TranscodeJob,
        report: JobStatusReport,
    ) -> DomainResult<TranscodeJob> {
        let status = match report.status.parse::<TranscodeStatus>() {
            Ok(status) => status,
            Err(_) => {
                warn!(
                    "Unknown transcoder status {:?} for job {}",
                    report.status, job.id
                );
                job.status
            }
        };

        job.status = status;
        job.progress = report.progress.clamp(0, 100);
        if report.output_path.is_some() {
            job.output_path = report.output_path;
        }
        if report.error.is_some() {
            job.error_message = report.error;
        }
        if status == TranscodeStatus::Completed {
            job.progress = 100;
        }
        let job = self.jobs.update(&job).await?;

        match status {
            TranscodeStatus::Completed => {
                let thumbnail = match job.kind {
                    TranscodeKind::Thumbnail => job.output_path.clone(),
                    TranscodeKind::Transcode => None,
                };
                self.videos
                    .set_transcode_result(job.video_id, TranscodeStatus::Completed, thumbnail)
                    .await?;
                info!("{} job {} completed for video {}", job.kind, job.id, job.video_id);
            }
            TranscodeStatus::Failed => {
                self.videos
                    .set_transcode_result(job.video_id, TranscodeStatus::Failed, None)
                    .await?;
                warn!(
                    "{} job {} failed for video {}: {}",
                    job.kind,
                    job.id,
                    job.video_id,
                    job.error_message.as_deref().unwrap_or("unknown error")
                );
            }
            TranscodeStatus::Pending | TranscodeStatus::Processing => {}
        }

        Ok(job)
    }

    /// 刷新所有进行中的任务
    ///
    /// # 返回值
    ///
    /// 成功刷新的任务数，单个任务失败只记录日志
    pub async fn poll_in_flight(&self, limit: u64) -> DomainResult<usize> {
        let jobs = self.jobs.list_in_flight(limit).await?;
        let mut refreshed = 0;
        for job in jobs {
            match self.refresh(job.id).await {
                Ok(_) => refreshed += 1,
                Err(e) => warn!("Failed to refresh transcode job {}: {}", job.id, e),
            }
        }
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::post::Visibility;
    use crate::domain::models::user::UserRole;
    use crate::infrastructure::database::fixtures::{
        create_post, create_user, create_video, setup_db,
    };
    use crate::infrastructure::repositories::transcode_job_repo_impl::TranscodeJobRepositoryImpl;
    use crate::infrastructure::repositories::video_repo_impl::VideoRepositoryImpl;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 可编排状态的转码服务替身
    #[derive(Default)]
    struct FakeTranscoder {
        fail_submit: bool,
        statuses: Mutex<HashMap<String, JobStatusReport>>,
        submitted: Mutex<Vec<String>>,
    }

    impl FakeTranscoder {
        fn set_status(&self, job_id: &str, status: &str, output: Option<&str>, error: Option<&str>) {
            self.statuses.lock().unwrap().insert(
                job_id.to_string(),
                JobStatusReport {
                    status: status.to_string(),
                    progress: 50,
                    output_path: output.map(str::to_string),
                    error: error.map(str::to_string),
                },
            );
        }

        fn next_id(&self) -> Result<String, TranscoderError> {
            if self.fail_submit {
                return Err(TranscoderError::Status {
                    status: 503,
                    body: "busy".to_string(),
                });
            }
            let mut submitted = self.submitted.lock().unwrap();
            let id = format!("gpu-{}", submitted.len() + 1);
            submitted.push(id.clone());
            Ok(id)
        }
    }

    #[async_trait]
    impl TranscoderClient for FakeTranscoder {
        async fn submit_transcode(&self, _: &TranscodeRequest) -> Result<String, TranscoderError> {
            self.next_id()
        }

        async fn submit_thumbnail(&self, _: &ThumbnailRequest) -> Result<String, TranscoderError> {
            self.next_id()
        }

        async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, TranscoderError> {
            self.statuses
                .lock()
                .unwrap()
                .get(job_id)
                .cloned()
                .ok_or_else(|| TranscoderError::Status {
                    status: 404,
                    body: "unknown job".to_string(),
                })
        }
    }

    async fn setup(client: Arc<FakeTranscoder>) -> (TranscodeService, Arc<VideoRepositoryImpl>, Uuid) {
        let db = setup_db().await;
        let user_id = create_user(&db, "curator", UserRole::Curator).await;
        let post_id = create_post(&db, user_id, "media", Visibility::Public, None, None).await;
        let video_id = create_video(&db, post_id, "Keynote").await;
        let videos = Arc::new(VideoRepositoryImpl::new(db.clone()));
        let service = TranscodeService::new(
            Arc::new(TranscodeJobRepositoryImpl::new(db)),
            videos.clone(),
            client,
            "/srv/out/",
        );
        (service, videos, video_id)
    }

    #[tokio::test]
    async fn test_transcode_lifecycle() {
        let client = Arc::new(FakeTranscoder::default());
        let (service, videos, video_id) = setup(client.clone()).await;

        let job = service.submit_transcode(video_id).await.unwrap();
        assert_eq!(job.external_job_id.as_deref(), Some("gpu-1"));
        let video = videos.find_by_id(video_id).await.unwrap().unwrap();
        assert_eq!(video.transcode_status, TranscodeStatus::Processing);

        client.set_status("gpu-1", "processing", None, None);
        let job = service.refresh(job.id).await.unwrap();
        assert_eq!(job.status, TranscodeStatus::Processing);
        assert_eq!(job.progress, 50);

        client.set_status("gpu-1", "completed", Some("/srv/out/master.m3u8"), None);
        assert_eq!(service.poll_in_flight(10).await.unwrap(), 1);
        let video = videos.find_by_id(video_id).await.unwrap().unwrap();
        assert_eq!(video.transcode_status, TranscodeStatus::Completed);
        assert!(video.thumbnail_path.is_none());

        // 已结束的任务不再轮询
        assert_eq!(service.poll_in_flight(10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_thumbnail_and_failure_paths() {
        let client = Arc::new(FakeTranscoder::default());
        let (service, videos, video_id) = setup(client.clone()).await;

        let err = service
            .submit_thumbnail(video_id, Some(5000.0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let thumb = service.submit_thumbnail(video_id, Some(30.0)).await.unwrap();
        client.set_status("gpu-1", "completed", Some("/srv/out/thumb.jpg"), None);
        let thumb = service.refresh(thumb.id).await.unwrap();
        assert_eq!(thumb.progress, 100);
        let video = videos.find_by_id(video_id).await.unwrap().unwrap();
        assert_eq!(video.thumbnail_path.as_deref(), Some("/srv/out/thumb.jpg"));

        let job = service.submit_transcode(video_id).await.unwrap();
        client.set_status("gpu-2", "failed", None, Some("codec not supported"));
        let job = service.refresh(job.id).await.unwrap();
        assert_eq!(job.status, TranscodeStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("codec not supported"));
        let video = videos.find_by_id(video_id).await.unwrap().unwrap();
        assert_eq!(video.transcode_status, TranscodeStatus::Failed);
    }

    #[tokio::test]
    async fn test_submit_failure_is_recorded_and_reported() {
        let client = Arc::new(FakeTranscoder {
            fail_submit: true,
            ..Default::default()
        });
        let (service, _, video_id) = setup(client).await;

        let err = service.submit_transcode(video_id).await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream(_)));

        let err = service.submit_transcode(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
