// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RetentionSettings;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::setting::{MAX_RETENTION_DAYS, VIEW_HISTORY_RETENTION_DAYS};
use crate::domain::models::view::{CleanupReport, RetentionTarget};
use crate::domain::repositories::view_repository::ViewRepository;
use crate::domain::services::settings_service::SettingsService;
use crate::infrastructure::metrics::{RETENTION_ROWS_DELETED_TOTAL, RETENTION_RUN_DURATION_SECONDS};
use chrono::{DateTime, TimeDelta, Utc};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 保留清理的批次参数
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// 默认保留天数，系统设置缺失时使用
    pub retention_days: i64,
    pub batch_size: u64,
    pub sleep: Duration,
    pub max_batches: u32,
    pub max_execution: Duration,
}

impl From<&RetentionSettings> for RetentionPolicy {
    fn from(settings: &RetentionSettings) -> Self {
        Self {
            retention_days: settings.retention_days,
            batch_size: settings.batch_size.max(1),
            sleep: Duration::from_millis(settings.sleep_ms),
            max_batches: settings.max_batches.max(1),
            max_execution: Duration::from_secs(settings.max_execution_seconds),
        }
    }
}

/// 保留期的截止时间，天数须在 1..=36500
fn retention_cutoff(now: DateTime<Utc>, days: i64) -> DomainResult<DateTime<Utc>> {
    if !(1..=MAX_RETENTION_DAYS).contains(&days) {
        return Err(DomainError::validation(
            "保持日数は 1〜36500 の整数で指定してください",
        ));
    }
    TimeDelta::try_days(days)
        .and_then(|retention| now.checked_sub_signed(retention))
        .ok_or_else(|| DomainError::validation("保持日数が大きすぎます"))
}

/// 观看历史保留清理服务
///
/// 以有上限的小批次删除过期行，避免长事务和长时间锁表
pub struct RetentionService {
    views: Arc<dyn ViewRepository>,
    settings: Arc<SettingsService>,
    policy: RetentionPolicy,
}

impl RetentionService {
    pub fn new(
        views: Arc<dyn ViewRepository>,
        settings: Arc<SettingsService>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            views,
            settings,
            policy,
        }
    }

    /// 删除早于保留期的行
    ///
    /// # 参数
    ///
    /// * `target` - 清理目标表
    /// * `retention_days` - 保留天数，为空时依次使用系统设置和配置默认值
    ///
    /// # 返回值
    ///
    /// * `Ok(CleanupReport)` - 删除行数、批次数以及是否清理完毕
    /// * `Err(DomainError)` - 保留天数非法或数据库错误
    pub async fn cleanup(
        &self,
        target: RetentionTarget,
        retention_days: Option<i64>,
    ) -> DomainResult<CleanupReport> {
        let days = match retention_days {
            Some(days) => days,
            None => {
                self.settings
                    .get_or(VIEW_HISTORY_RETENTION_DAYS, self.policy.retention_days)
                    .await
            }
        };
        let cutoff = retention_cutoff(Utc::now(), days)?;
        let started = Instant::now();
        let mut deleted = 0u64;
        let mut batches = 0u32;
        let mut completed = false;

        info!(
            "Retention cleanup started: target={}, cutoff={}",
            target, cutoff
        );

        loop {
            let removed = self
                .views
                .delete_batch_before(target, cutoff, self.policy.batch_size)
                .await?;
            deleted += removed;
            batches += 1;

            if removed < self.policy.batch_size {
                completed = true;
                break;
            }
            if batches >= self.policy.max_batches {
                warn!(
                    "Retention cleanup for {} stopped after {} batches",
                    target, batches
                );
                break;
            }
            if started.elapsed() >= self.policy.max_execution {
                warn!(
                    "Retention cleanup for {} stopped after {:?}",
                    target,
                    started.elapsed()
                );
                break;
            }

            tokio::time::sleep(self.policy.sleep).await;
        }

        let elapsed = started.elapsed();
        counter!(RETENTION_ROWS_DELETED_TOTAL).increment(deleted);
        histogram!(RETENTION_RUN_DURATION_SECONDS).record(elapsed.as_secs_f64());
        info!(
            "Retention cleanup finished: target={}, deleted={}, batches={}, completed={}",
            target, deleted, batches, completed
        );

        Ok(CleanupReport {
            target,
            cutoff,
            deleted,
            batches,
            completed,
            elapsed_ms: elapsed.as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::post::Visibility;
    use crate::domain::models::user::UserRole;
    use crate::domain::repositories::setting_repository::SettingRepository;
    use crate::infrastructure::database::entities::view_history;
    use crate::infrastructure::database::fixtures::{
        create_post, create_user, create_video, setup_db,
    };
    use crate::infrastructure::repositories::setting_repo_impl::SettingRepositoryImpl;
    use crate::infrastructure::repositories::view_repo_impl::ViewRepositoryImpl;
    use sea_orm::{DatabaseConnection, EntityTrait};
    use uuid::Uuid;

    fn policy(batch_size: u64, max_batches: u32) -> RetentionPolicy {
        RetentionPolicy {
            retention_days: 365,
            batch_size,
            sleep: Duration::from_millis(1),
            max_batches,
            max_execution: Duration::from_secs(30),
        }
    }

    /// 为 `count` 个不同视频写入指定天数前的终身历史
    async fn seed(db: &Arc<DatabaseConnection>, user_id: Uuid, post_id: Uuid, count: usize, days_ago: i64) {
        let repo = ViewRepositoryImpl::new(db.clone());
        let at = Utc::now() - TimeDelta::days(days_ago);
        for i in 0..count {
            let video_id = create_video(db, post_id, &format!("v{}-{}", days_ago, i)).await;
            repo.upsert_history(user_id, video_id, 10.0, 10.0, at)
                .await
                .unwrap();
        }
    }

    async fn setup(policy: RetentionPolicy) -> (Arc<DatabaseConnection>, RetentionService, Uuid, Uuid) {
        let db = setup_db().await;
        let user_id = create_user(&db, "bob", UserRole::Viewer).await;
        let post_id = create_post(&db, user_id, "archive", Visibility::Public, None, None).await;
        let settings = Arc::new(SettingsService::new(Arc::new(SettingRepositoryImpl::new(
            db.clone(),
        ))));
        let service = RetentionService::new(
            Arc::new(ViewRepositoryImpl::new(db.clone())),
            settings,
            policy,
        );
        (db, service, user_id, post_id)
    }

    #[tokio::test]
    async fn test_cleanup_never_touches_rows_newer_than_cutoff() {
        let (db, service, user_id, post_id) = setup(policy(2, 100)).await;
        seed(&db, user_id, post_id, 5, 400).await;
        seed(&db, user_id, post_id, 3, 30).await;

        let report = service
            .cleanup(RetentionTarget::ViewHistory, None)
            .await
            .unwrap();

        assert_eq!(report.deleted, 5);
        assert_eq!(report.batches, 3);
        assert!(report.completed);

        let remaining = view_history::Entity::find().all(db.as_ref()).await.unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining
            .iter()
            .all(|row| row.last_watched_at.with_timezone(&Utc) >= report.cutoff));
    }

    #[tokio::test]
    async fn test_cleanup_stops_at_batch_cap() {
        let (db, service, user_id, post_id) = setup(policy(2, 2)).await;
        seed(&db, user_id, post_id, 5, 400).await;

        let report = service
            .cleanup(RetentionTarget::ViewHistory, Some(365))
            .await
            .unwrap();

        assert_eq!(report.deleted, 4);
        assert_eq!(report.batches, 2);
        assert!(!report.completed);
    }

    #[tokio::test]
    async fn test_retention_days_resolution() {
        let (db, service, user_id, post_id) = setup(policy(100, 10)).await;
        seed(&db, user_id, post_id, 2, 60).await;

        // 默认 365 天，不删除
        let report = service
            .cleanup(RetentionTarget::ViewHistory, None)
            .await
            .unwrap();
        assert_eq!(report.deleted, 0);
        assert!(report.completed);

        // 系统设置优先于默认值
        SettingRepositoryImpl::new(db.clone())
            .upsert("view_history_retention_days", "30", None)
            .await
            .unwrap();
        let report = service
            .cleanup(RetentionTarget::ViewHistory, None)
            .await
            .unwrap();
        assert_eq!(report.deleted, 2);

        let err = service
            .cleanup(RetentionTarget::ViewHistory, Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_oversized_retention_is_rejected() {
        let (_, service, _, _) = setup(policy(100, 10)).await;

        for days in [36501, 200_000_000, i64::MAX] {
            let err = service
                .cleanup(RetentionTarget::ViewHistory, Some(days))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }

        service
            .cleanup(RetentionTarget::ViewHistory, Some(36500))
            .await
            .unwrap();
    }
}
