// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::analytics::DailyViewStat;
use crate::domain::models::page::PageRequest;
use crate::domain::models::view::{
    RetentionTarget, SessionRecord, ViewHistory, ViewProgress, ViewThresholds,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// 观看数据仓库特质
///
/// 会话日志、播放计数与观看历史的持久化接口
#[async_trait]
pub trait ViewRepository: Send + Sync {
    /// 记录一次进度上报并按需增加视频播放数
    ///
    /// 查找或创建会话日志、翻转计数标记、播放数加一在同一事务内完成，
    /// 同一会话日志最多使播放数增加一次。视频不存在时返回 `NotFound`。
    async fn record_session(
        &self,
        progress: &ViewProgress,
        thresholds: &ViewThresholds,
        now: DateTime<Utc>,
    ) -> Result<SessionRecord, RepositoryError>;

    /// 合并终身观看历史，观看时间和完成率取最大值
    async fn upsert_history(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        watch_duration: f64,
        completion_rate: f64,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// 合并按日观看历史，每次调用 session_count 加一
    async fn upsert_daily_history(
        &self,
        user_id: Uuid,
        video_id: Uuid,
        view_date: NaiveDate,
        watch_duration: f64,
        completion_rate: f64,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// 用户的终身观看历史，最近观看在前
    async fn list_history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<ViewHistory>, u64), RepositoryError>;

    /// 删除一批早于截止时间的行
    ///
    /// # 返回值
    ///
    /// 本批删除的行数，小于 `batch_size` 表示已无剩余
    async fn delete_batch_before(
        &self,
        target: RetentionTarget,
        cutoff: DateTime<Utc>,
        batch_size: u64,
    ) -> Result<u64, RepositoryError>;

    /// 自 `since` 起的按日观看汇总，`video_id` 为空时统计全部视频
    async fn daily_stats(
        &self,
        video_id: Option<Uuid>,
        since: NaiveDate,
    ) -> Result<Vec<DailyViewStat>, RepositoryError>;
}
