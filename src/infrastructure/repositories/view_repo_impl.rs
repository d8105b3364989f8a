// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::analytics::DailyViewStat;
use crate::domain::models::page::PageRequest;
use crate::domain::models::view::{
    RetentionTarget, SessionRecord, ViewHistory, ViewLog, ViewProgress, ViewThresholds,
};
use crate::domain::repositories::view_repository::ViewRepository;
use crate::infrastructure::database::entities::{
    daily_view_history, video as video_entity, view_history, view_log,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    sea_query::{Alias, Expr, IntoColumnRef, SimpleExpr},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 观看数据仓库实现
///
/// 播放计数依赖两步条件更新：先以 `view_count_updated = false` 为条件翻转会话标记，
/// 仅当该更新影响一行时才增加视频播放数，两步位于同一事务。
#[derive(Clone)]
pub struct ViewRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ViewRepositoryImpl {
    /// 创建新的观看数据仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的观看数据仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct DailyRow {
    view_date: NaiveDate,
    sessions: Option<i64>,
    viewers: i64,
    watch_seconds: Option<f64>,
}

impl From<view_log::Model> for ViewLog {
    fn from(model: view_log::Model) -> Self {
        Self {
            id: model.id,
            video_id: model.video_id,
            user_id: model.user_id,
            session_id: model.session_id,
            watch_duration: model.watch_duration,
            completion_rate: model.completion_rate,
            view_count_updated: model.view_count_updated,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<view_history::Model> for ViewHistory {
    fn from(model: view_history::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            video_id: model.video_id,
            total_watch_time: model.total_watch_time,
            completion_rate: model.completion_rate,
            last_watched_at: model.last_watched_at.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// `max(col, value)` 的可移植写法，在数据库端取较大值
fn keep_max<C>(col: C, value: f64) -> SimpleExpr
where
    C: IntoColumnRef + Copy,
{
    Expr::case(Expr::col(col).lt(value), value)
        .finally(Expr::col(col))
        .into()
}

#[async_trait]
impl ViewRepository for ViewRepositoryImpl {
    async fn record_session(
        &self,
        progress: &ViewProgress,
        thresholds: &ViewThresholds,
        now: DateTime<Utc>,
    ) -> Result<SessionRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let video = video_entity::Entity::find_by_id(progress.video_id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let window_start = thresholds.window_start(now).fixed_offset();
        let existing = view_log::Entity::find()
            .filter(view_log::Column::VideoId.eq(progress.video_id))
            .filter(view_log::Column::SessionId.eq(progress.session_id.as_str()))
            .filter(view_log::Column::CreatedAt.gte(window_start))
            .order_by_desc(view_log::Column::CreatedAt)
            .one(&txn)
            .await?;

        let (log, created) = match existing {
            Some(model) => {
                let keep_user = model.user_id;
                let mut active: view_log::ActiveModel = model.into();
                active.watch_duration = Set(progress.watch_duration);
                active.completion_rate = Set(progress.completion_rate);
                if keep_user.is_none() && progress.user_id.is_some() {
                    active.user_id = Set(progress.user_id);
                }
                active.updated_at = Set(now.fixed_offset());
                (active.update(&txn).await?, false)
            }
            None => {
                let active = view_log::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    video_id: Set(progress.video_id),
                    user_id: Set(progress.user_id),
                    session_id: Set(progress.session_id.clone()),
                    watch_duration: Set(progress.watch_duration),
                    completion_rate: Set(progress.completion_rate),
                    view_count_updated: Set(false),
                    created_at: Set(now.fixed_offset()),
                    updated_at: Set(now.fixed_offset()),
                };
                (active.insert(&txn).await?, true)
            }
        };

        let mut log = ViewLog::from(log);
        let mut counted = false;
        let mut view_count = video.view_count;

        if !log.view_count_updated
            && thresholds.is_met(progress.watch_duration, progress.completion_rate)
        {
            let flipped = view_log::Entity::update_many()
                .col_expr(view_log::Column::ViewCountUpdated, Expr::value(true))
                .filter(view_log::Column::Id.eq(log.id))
                .filter(view_log::Column::ViewCountUpdated.eq(false))
                .exec(&txn)
                .await?;

            if flipped.rows_affected == 1 {
                video_entity::Entity::update_many()
                    .col_expr(
                        video_entity::Column::ViewCount,
                        Expr::col(video_entity::Column::ViewCount).add(1),
                    )
                    .filter(video_entity::Column::Id.eq(progress.video_id))
                    .exec(&txn)
                    .await?;
                counted = true;
                log.view_count_updated = true;
            }
        }

        if counted {
            view_count = video_entity::Entity::find_by_id(progress.video_id)
                .one(&txn)
                .await?
                .map(|v| v.view_count)
                .unwrap_or(view_count + 1);
        }

        txn.commit().await?;

        Ok(SessionRecord {
            log,
            created,
            counted,
            view_count,
        })
    }

    async fn upsert_history(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        watch_duration: f64,
        completion_rate: f64,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let find = || {
            view_history::Entity::find()
                .filter(view_history::Column::UserId.eq(user_id))
                .filter(view_history::Column::VideoId.eq(video_id))
                .one(self.db.as_ref())
        };

        let mut existing = find().await?;
        if existing.is_none() {
            let inserted = view_history::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                video_id: Set(video_id),
                total_watch_time: Set(watch_duration),
                completion_rate: Set(completion_rate),
                last_watched_at: Set(now.fixed_offset()),
                created_at: Set(now.fixed_offset()),
            }
            .insert(self.db.as_ref())
            .await;

            match inserted.map_err(RepositoryError::from) {
                Ok(_) => return Ok(()),
                // 并发插入落败，转为合并已存在的行
                Err(RepositoryError::Conflict(_)) => existing = find().await?,
                Err(e) => return Err(e),
            }
        }

        let model = existing.ok_or(RepositoryError::NotFound)?;
        let result = view_history::Entity::update_many()
            .col_expr(
                view_history::Column::TotalWatchTime,
                keep_max(view_history::Column::TotalWatchTime, watch_duration),
            )
            .col_expr(
                view_history::Column::CompletionRate,
                keep_max(view_history::Column::CompletionRate, completion_rate),
            )
            .col_expr(
                view_history::Column::LastWatchedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(view_history::Column::Id.eq(model.id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn upsert_daily_history(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        view_date: NaiveDate,
        watch_duration: f64,
        completion_rate: f64,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let find = || {
            daily_view_history::Entity::find()
                .filter(daily_view_history::Column::UserId.eq(user_id))
                .filter(daily_view_history::Column::VideoId.eq(video_id))
                .filter(daily_view_history::Column::ViewDate.eq(view_date))
                .one(self.db.as_ref())
        };

        let mut existing = find().await?;
        if existing.is_none() {
            let inserted = daily_view_history::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                video_id: Set(video_id),
                view_date: Set(view_date),
                watch_duration: Set(watch_duration),
                completion_rate: Set(completion_rate),
                session_count: Set(1),
                first_watched_at: Set(now.fixed_offset()),
                last_watched_at: Set(now.fixed_offset()),
            }
            .insert(self.db.as_ref())
            .await;

            match inserted.map_err(RepositoryError::from) {
                Ok(_) => return Ok(()),
                Err(RepositoryError::Conflict(_)) => existing = find().await?,
                Err(e) => return Err(e),
            }
        }

        let model = existing.ok_or(RepositoryError::NotFound)?;
        let result = daily_view_history::Entity::update_many()
            .col_expr(
                daily_view_history::Column::WatchDuration,
                keep_max(daily_view_history::Column::WatchDuration, watch_duration),
            )
            .col_expr(
                daily_view_history::Column::CompletionRate,
                keep_max(daily_view_history::Column::CompletionRate, completion_rate),
            )
            .col_expr(
                daily_view_history::Column::SessionCount,
                Expr::col(daily_view_history::Column::SessionCount).add(1),
            )
            .col_expr(
                daily_view_history::Column::LastWatchedAt,
                Expr::value(now.fixed_offset()),
            )
            .filter(daily_view_history::Column::Id.eq(model.id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<ViewHistory>, u64), RepositoryError> {
        let query = view_history::Entity::find().filter(view_history::Column::UserId.eq(user_id));

        let total = query.clone().count(self.db.as_ref()).await?;
        let models = query
            .order_by_desc(view_history::Column::LastWatchedAt)
            .offset(page.offset())
            .limit(page.per_page)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(ViewHistory::from).collect(), total))
    }

    async fn delete_batch_before(
        &self,
        target: RetentionTarget,
        cutoff: DateTime<Utc>,
        batch_size: u64,
    ) -> Result<u64, RepositoryError> {
        let cutoff = cutoff.fixed_offset();

        // 先取一批ID再按ID删除，避免依赖 DELETE ... LIMIT 的方言支持
        let deleted = match target {
            RetentionTarget::ViewHistory => {
                let ids: Vec<Uuid> = view_history::Entity::find()
                    .select_only()
                    .column(view_history::Column::Id)
                    .filter(view_history::Column::LastWatchedAt.lt(cutoff))
                    .order_by_asc(view_history::Column::LastWatchedAt)
                    .limit(batch_size)
                    .into_tuple()
                    .all(self.db.as_ref())
                    .await?;
                if ids.is_empty() {
                    return Ok(0);
                }
                view_history::Entity::delete_many()
                    .filter(view_history::Column::Id.is_in(ids))
                    .filter(view_history::Column::LastWatchedAt.lt(cutoff))
                    .exec(self.db.as_ref())
                    .await?
            }
            RetentionTarget::DailyViewHistory => {
                let ids: Vec<Uuid> = daily_view_history::Entity::find()
                    .select_only()
                    .column(daily_view_history::Column::Id)
                    .filter(daily_view_history::Column::LastWatchedAt.lt(cutoff))
                    .order_by_asc(daily_view_history::Column::LastWatchedAt)
                    .limit(batch_size)
                    .into_tuple()
                    .all(self.db.as_ref())
                    .await?;
                if ids.is_empty() {
                    return Ok(0);
                }
                daily_view_history::Entity::delete_many()
                    .filter(daily_view_history::Column::Id.is_in(ids))
                    .filter(daily_view_history::Column::LastWatchedAt.lt(cutoff))
                    .exec(self.db.as_ref())
                    .await?
            }
            RetentionTarget::ViewLogs => {
                let ids: Vec<Uuid> = view_log::Entity::find()
                    .select_only()
                    .column(view_log::Column::Id)
                    .filter(view_log::Column::CreatedAt.lt(cutoff))
                    .order_by_asc(view_log::Column::CreatedAt)
                    .limit(batch_size)
                    .into_tuple()
                    .all(self.db.as_ref())
                    .await?;
                if ids.is_empty() {
                    return Ok(0);
                }
                view_log::Entity::delete_many()
                    .filter(view_log::Column::Id.is_in(ids))
                    .filter(view_log::Column::CreatedAt.lt(cutoff))
                    .exec(self.db.as_ref())
                    .await?
            }
        };

        Ok(deleted.rows_affected)
    }

    async fn daily_stats(
        &self,
        video_id: Option<Uuid>,
        since: NaiveDate,
    ) -> Result<Vec<DailyViewStat>, RepositoryError> {
        let mut query = daily_view_history::Entity::find()
            .select_only()
            .column(daily_view_history::Column::ViewDate)
            .column_as(
                Expr::col(daily_view_history::Column::SessionCount)
                    .sum()
                    .cast_as(Alias::new("BIGINT")),
                "sessions",
            )
            .column_as(
                Expr::col(daily_view_history::Column::UserId).count_distinct(),
                "viewers",
            )
            .column_as(
                Expr::col(daily_view_history::Column::WatchDuration).sum(),
                "watch_seconds",
            )
            .filter(daily_view_history::Column::ViewDate.gte(since));

        if let Some(video_id) = video_id {
            query = query.filter(daily_view_history::Column::VideoId.eq(video_id));
        }

        let rows = query
            .group_by(daily_view_history::Column::ViewDate)
            .order_by_asc(daily_view_history::Column::ViewDate)
            .into_model::<DailyRow>()
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailyViewStat {
                date: row.view_date,
                sessions: row.sessions.unwrap_or(0),
                viewers: row.viewers,
                watch_seconds: row.watch_seconds.unwrap_or(0.0),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::domain::models::post::Visibility;
    use crate::domain::models::user::UserRole;
    use crate::infrastructure::database::fixtures::{
        create_post, create_user, create_video, setup_db,
    };

    async fn setup() -> (Arc<DatabaseConnection>, Uuid, Uuid) {
        let db = setup_db().await;
        let user_id = create_user(&db, "viewer", UserRole::Viewer).await;
        let post_id = create_post(&db, user_id, "intro", Visibility::Public, None, None).await;
        let video_id = create_video(&db, post_id, "Welcome").await;
        (db, user_id, video_id)
    }

    fn thresholds() -> ViewThresholds {
        ViewThresholds {
            percent: 30.0,
            seconds: 600.0,
            window_hours: 24,
        }
    }

    fn progress(video_id: Uuid, session: &str, duration: f64, rate: f64) -> ViewProgress {
        ViewProgress {
            video_id,
            watch_duration: duration,
            completion_rate: rate,
            session_id: session.to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_session_counts_once_within_window() {
        let (db, _, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db);
        let now = Utc::now();

        let first = repo
            .record_session(&progress(video_id, "s1", 10.0, 5.0), &thresholds(), now)
            .await
            .unwrap();
        assert!(first.created);
        assert!(!first.counted);
        assert_eq!(first.view_count, 0);

        let second = repo
            .record_session(&progress(video_id, "s1", 400.0, 35.0), &thresholds(), now)
            .await
            .unwrap();
        assert!(!second.created);
        assert!(second.counted);
        assert_eq!(second.view_count, 1);

        let third = repo
            .record_session(&progress(video_id, "s1", 900.0, 80.0), &thresholds(), now)
            .await
            .unwrap();
        assert!(!third.counted);
        assert_eq!(third.view_count, 1);
        assert_eq!(third.log.id, first.log.id);
    }

    #[tokio::test]
    async fn test_new_session_after_window_counts_again() {
        let (db, _, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db);
        let earlier = Utc::now() - Duration::hours(30);

        let first = repo
            .record_session(&progress(video_id, "s1", 700.0, 10.0), &thresholds(), earlier)
            .await
            .unwrap();
        assert!(first.counted);

        let later = repo
            .record_session(&progress(video_id, "s1", 700.0, 10.0), &thresholds(), Utc::now())
            .await
            .unwrap();
        assert!(later.created);
        assert!(later.counted);
        assert_eq!(later.view_count, 2);
    }

    #[tokio::test]
    async fn test_missing_video_is_not_found() {
        let (db, _, _) = setup().await;
        let repo = ViewRepositoryImpl::new(db);

        let result = repo
            .record_session(
                &progress(Uuid::new_v4(), "s1", 1.0, 1.0),
                &thresholds(),
                Utc::now(),
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_daily_history_session_count_grows_per_report() {
        let (db, user_id, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db.clone());
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let now = Utc::now();

        for (duration, rate) in [(10.0, 5.0), (50.0, 2.0), (30.0, 40.0)] {
            repo.upsert_daily_history(user_id, video_id, day, duration, rate, now)
                .await
                .unwrap();
        }

        let row = daily_view_history::Entity::find()
            .one(db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.session_count, 3);
        assert_eq!(row.watch_duration, 50.0);
        assert_eq!(row.completion_rate, 40.0);
    }

    #[tokio::test]
    async fn test_history_keeps_maximum_values() {
        let (db, user_id, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db);
        let now = Utc::now();

        repo.upsert_history(user_id, video_id, 300.0, 60.0, now)
            .await
            .unwrap();
        repo.upsert_history(user_id, video_id, 100.0, 90.0, now)
            .await
            .unwrap();

        let (items, total) = repo
            .list_history(user_id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].total_watch_time, 300.0);
        assert_eq!(items[0].completion_rate, 90.0);
    }

    #[tokio::test]
    async fn test_concurrent_reports_from_one_session_count_once() {
        let (db, _, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db.clone());
        let now = Utc::now();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.record_session(
                        &progress(video_id, "shared", 650.0 + i as f64, 40.0),
                        &thresholds(),
                        now,
                    )
                    .await
                })
            })
            .collect();

        let mut counted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().counted {
                counted += 1;
            }
        }
        assert_eq!(counted, 1);

        let video = video_entity::Entity::find_by_id(video_id)
            .one(db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(video.view_count, 1);

        let logs = view_log::Entity::find().all(db.as_ref()).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].view_count_updated);
    }

    #[tokio::test]
    async fn test_oversized_window_does_not_overflow() {
        let (db, _, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db);
        let huge = ViewThresholds {
            window_hours: 10_000_000_000,
            ..thresholds()
        };

        let outcome = repo
            .record_session(&progress(video_id, "s1", 700.0, 10.0), &huge, Utc::now())
            .await
            .unwrap();
        assert!(outcome.counted);
    }

    #[tokio::test]
    async fn test_concurrent_daily_reports_keep_maximum() {
        let (db, user_id, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db.clone());
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let now = Utc::now();

        let reports = [(900.0, 10.0), (50.0, 75.0), (300.0, 20.0), (10.0, 5.0)];
        let handles: Vec<_> = reports
            .into_iter()
            .map(|(duration, rate)| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.upsert_daily_history(user_id, video_id, day, duration, rate, now)
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let row = daily_view_history::Entity::find()
            .one(db.as_ref())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.session_count, 4);
        assert_eq!(row.watch_duration, 900.0);
        assert_eq!(row.completion_rate, 75.0);
    }

    #[tokio::test]
    async fn test_delete_batch_respects_cutoff() {
        let (db, user_id, video_id) = setup().await;
        let repo = ViewRepositoryImpl::new(db);
        let old = Utc::now() - Duration::days(400);
        let recent = Utc::now() - Duration::days(2);

        for i in 0..3 {
            repo.upsert_daily_history(
                user_id,
                video_id,
                NaiveDate::from_ymd_opt(2020, 1, 1 + i).unwrap(),
                1.0,
                1.0,
                old,
            )
            .await
            .unwrap();
        }
        repo.upsert_daily_history(
            user_id,
            video_id,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            1.0,
            1.0,
            recent,
        )
        .await
        .unwrap();

        let cutoff = Utc::now() - Duration::days(365);
        let first = repo
            .delete_batch_before(RetentionTarget::DailyViewHistory, cutoff, 2)
            .await
            .unwrap();
        let second = repo
            .delete_batch_before(RetentionTarget::DailyViewHistory, cutoff, 2)
            .await
            .unwrap();
        let third = repo
            .delete_batch_before(RetentionTarget::DailyViewHistory, cutoff, 2)
            .await
            .unwrap();

        assert_eq!((first, second, third), (2, 1, 0));

        let stats = repo
            .daily_stats(Some(video_id), NaiveDate::from_ymd_opt(2000, 1, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].sessions, 1);
        assert_eq!(stats[0].viewers, 1);
    }
}
