// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::DomainResult;
use crate::domain::repositories::post_repository::PostRepository;
use crate::infrastructure::metrics::SCHEDULED_TRANSITIONS_TOTAL;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 一次定时发布执行的结果
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ScheduleReport {
    /// 本次公开的帖子
    pub published: Vec<Uuid>,
    /// 本次转为私有的帖子
    pub unpublished: Vec<Uuid>,
}

/// 定时发布服务
///
/// 先处理到期的发布，再处理到期的下线；同一帖子两个时间都已到期时，
/// 一次执行内会先公开再转为私有。
pub struct PublishSchedulerService {
    posts: Arc<dyn PostRepository>,
}

impl PublishSchedulerService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// 执行到期的可见性切换
    ///
    /// # 参数
    ///
    /// * `now` - 判断到期的基准时间
    ///
    /// # 返回值
    ///
    /// 本次实际切换的帖子ID
    pub async fn run_scheduled_transitions(&self, now: DateTime<Utc>) -> DomainResult<ScheduleReport> {
        let published = self.posts.publish_due(now).await?;
        let unpublished = self.posts.unpublish_due(now).await?;

        let total = (published.len() + unpublished.len()) as u64;
        if total > 0 {
            counter!(SCHEDULED_TRANSITIONS_TOTAL).increment(total);
            info!(
                "Scheduled transitions applied: {} published, {} unpublished",
                published.len(),
                unpublished.len()
            );
        }

        Ok(ScheduleReport {
            published,
            unpublished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::post::Visibility;
    use crate::domain::models::user::UserRole;
    use crate::infrastructure::database::entities::post as post_entity;
    use crate::infrastructure::database::fixtures::{create_post, create_user, setup_db};
    use crate::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
    use chrono::Duration;
    use sea_orm::{DatabaseConnection, EntityTrait};

    async fn load(db: &DatabaseConnection, id: Uuid) -> post_entity::Model {
        post_entity::Entity::find_by_id(id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_due_posts_are_published_and_unpublished() {
        let db = setup_db().await;
        let creator = create_user(&db, "curator", UserRole::Curator).await;
        let now = Utc::now();
        let past = now - Duration::hours(2);
        let future = now + Duration::hours(2);

        let draft_due =
            create_post(&db, creator, "draft-due", Visibility::Draft, Some(past), None).await;
        let private_due =
            create_post(&db, creator, "private-due", Visibility::Private, Some(past), None).await;
        let not_yet =
            create_post(&db, creator, "not-yet", Visibility::Draft, Some(future), None).await;
        let expiring =
            create_post(&db, creator, "expiring", Visibility::Public, None, Some(past)).await;
        let already_private =
            create_post(&db, creator, "already-private", Visibility::Private, None, Some(past))
                .await;

        let service = PublishSchedulerService::new(Arc::new(PostRepositoryImpl::new(db.clone())));
        let report = service.run_scheduled_transitions(now).await.unwrap();

        assert_eq!(report.published.len(), 2);
        assert!(report.published.contains(&draft_due));
        assert!(report.published.contains(&private_due));
        assert_eq!(report.unpublished, vec![expiring]);

        let published = load(&db, draft_due).await;
        assert_eq!(published.visibility, "PUBLIC");
        assert!(published.published_at.is_some());
        assert!(published.scheduled_publish_at.is_none());

        assert_eq!(load(&db, not_yet).await.visibility, "DRAFT");

        let unpublished = load(&db, expiring).await;
        assert_eq!(unpublished.visibility, "PRIVATE");
        assert!(unpublished.scheduled_unpublish_at.is_none());

        // 非公开帖子的下线时间保持原样
        assert!(load(&db, already_private)
            .await
            .scheduled_unpublish_at
            .is_some());

        let second = service.run_scheduled_transitions(now).await.unwrap();
        assert_eq!(second, ScheduleReport::default());
    }
}
