// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::analytics::{AnalyticsOverview, DailyViewStat};
use crate::domain::repositories::post_repository::PostRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::repositories::video_repository::VideoRepository;
use crate::domain::repositories::view_repository::ViewRepository;
use crate::domain::services::video_service::video_not_found;
use crate::domain::services::view_tracking_service::ViewTrackingService;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// 排行榜条数
const TOP_VIDEOS: u64 = 10;
/// 统计窗口上限（天）
const MAX_DAYS: i64 = 366;

/// 单个视频的按日统计
#[derive(Debug, Clone, Serialize)]
pub struct VideoAnalytics {
    pub video_id: Uuid,
    pub title: String,
    pub view_count: i64,
    pub daily: Vec<DailyViewStat>,
}

/// 管理端统计服务
pub struct AnalyticsService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    videos: Arc<dyn VideoRepository>,
    views: Arc<dyn ViewRepository>,
    tracking: Arc<ViewTrackingService>,
}

impl AnalyticsService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        videos: Arc<dyn VideoRepository>,
        views: Arc<dyn ViewRepository>,
        tracking: Arc<ViewTrackingService>,
    ) -> Self {
        Self {
            users,
            posts,
            videos,
            views,
            tracking,
        }
    }

    /// 最近 `days` 天（含今天）窗口的起始日期，按每日历史的时区计算
    fn window_start(&self, days: i64) -> DomainResult<chrono::NaiveDate> {
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(DomainError::validation(format!(
                "集計期間は 1〜{} 日で指定してください",
                MAX_DAYS
            )));
        }
        let today = self.tracking.report_date(Utc::now());
        Ok(today - Duration::days(days - 1))
    }

    /// 全站概览
    ///
    /// # 参数
    ///
    /// * `days` - 按日统计覆盖的天数
    pub async fn overview(&self, days: i64) -> DomainResult<AnalyticsOverview> {
        let since = self.window_start(days)?;

        Ok(AnalyticsOverview {
            total_users: self.users.count().await?,
            total_posts: self.posts.count().await?,
            total_videos: self.videos.count().await?,
            total_views: self.videos.total_views().await?,
            top_videos: self.videos.top_by_views(TOP_VIDEOS).await?,
            daily: self.views.daily_stats(None, since).await?,
        })
    }

    /// 单个视频的按日明细
    pub async fn video(&self, video_id: Uuid, days: i64) -> DomainResult<VideoAnalytics> {
        let since = self.window_start(days)?;
        let video = self
            .videos
            .find_by_id(video_id)
            .await?
            .ok_or_else(video_not_found)?;

        Ok(VideoAnalytics {
            video_id: video.id,
            title: video.title,
            view_count: video.view_count,
            daily: self.views.daily_stats(Some(video_id), since).await?,
        })
    }
}
