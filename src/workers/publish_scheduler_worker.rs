// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::DomainResult;
use crate::domain::services::publish_scheduler_service::{PublishSchedulerService, ScheduleReport};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 排期发布工作器
///
/// 按固定间隔发布到期的帖子，并下架到期的公开帖子
pub struct PublishSchedulerWorker {
    scheduler: Arc<PublishSchedulerService>,
    interval: Duration,
}

impl PublishSchedulerWorker {
    pub fn new(scheduler: Arc<PublishSchedulerService>, interval: Duration) -> Self {
        Self {
            scheduler,
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!(
            "Publish scheduler worker started (every {}s)",
            self.interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;

            match self.run_once().await {
                Ok(report) => {
                    if !report.published.is_empty() || !report.unpublished.is_empty() {
                        info!(
                            "Scheduled transitions: {} published, {} unpublished",
                            report.published.len(),
                            report.unpublished.len()
                        );
                    }
                }
                Err(e) => {
                    error!("Failed to run scheduled transitions: {}", e);
                }
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run_once(&self) -> DomainResult<ScheduleReport> {
        self.scheduler.run_scheduled_transitions(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::post::Visibility;
    use crate::domain::models::user::UserRole;
    use crate::infrastructure::database::entities::post;
    use crate::infrastructure::database::fixtures::{create_post, create_user, setup_db};
    use crate::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn test_run_once_publishes_due_posts() {
        let db = setup_db().await;
        let user_id = create_user(&db, "curator", UserRole::Curator).await;
        let due = Utc::now() - chrono::Duration::minutes(5);
        let later = Utc::now() + chrono::Duration::hours(5);
        let due_id = create_post(&db, user_id, "due", Visibility::Draft, Some(due), None).await;
        let later_id = create_post(&db, user_id, "later", Visibility::Draft, Some(later), None).await;

        let worker = PublishSchedulerWorker::new(
            Arc::new(PublishSchedulerService::new(Arc::new(PostRepositoryImpl::new(
                db.clone(),
            )))),
            Duration::from_secs(60),
        );

        let report = worker.run_once().await.unwrap();
        assert_eq!(report.published, vec![due_id]);

        let published = post::Entity::find_by_id(due_id).one(db.as_ref()).await.unwrap().unwrap();
        assert_eq!(published.visibility, Visibility::Public.to_string());
        let pending = post::Entity::find_by_id(later_id).one(db.as_ref()).await.unwrap().unwrap();
        assert_eq!(pending.visibility, Visibility::Draft.to_string());
    }
}
