// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// 播放数排行中的一项
#[derive(Debug, Clone, Serialize)]
pub struct VideoViewStat {
    pub video_id: Uuid,
    pub title: String,
    pub view_count: i64,
}

/// 某一天的观看汇总（仅统计登录用户）
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyViewStat {
    pub date: NaiveDate,
    /// 上报次数合计
    pub sessions: i64,
    /// 去重后的用户数
    pub viewers: i64,
    /// 观看秒数合计
    pub watch_seconds: f64,
}

/// 管理端统计概览
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsOverview {
    pub total_users: u64,
    pub total_posts: u64,
    pub total_videos: u64,
    pub total_views: i64,
    pub top_videos: Vec<VideoViewStat>,
    pub daily: Vec<DailyViewStat>,
}
