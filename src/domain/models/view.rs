// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::setting::MAX_DUPLICATE_WINDOW_HOURS;

/// 原始观看会话日志
///
/// 同一视频、同一会话指纹在去重窗口内只有一行，
/// `view_count_updated` 标记该会话是否已计入播放数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewLog {
    pub id: Uuid,
    pub video_id: Uuid,
    pub user_id: Option<Uuid>,
    /// 会话指纹
    pub session_id: String,
    /// 最近一次上报的累计观看秒数
    pub watch_duration: f64,
    /// 最近一次上报的完成率（0-100）
    pub completion_rate: f64,
    pub view_count_updated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户对视频的终身观看摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    /// 历史最大观看秒数
    pub total_watch_time: f64,
    /// 历史最大完成率
    pub completion_rate: f64,
    pub last_watched_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 用户对视频的按日观看记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyViewHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub view_date: NaiveDate,
    pub watch_duration: f64,
    pub completion_rate: f64,
    /// 当天的上报次数
    pub session_count: i32,
    pub first_watched_at: DateTime<Utc>,
    pub last_watched_at: DateTime<Utc>,
}

/// 播放计数阈值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewThresholds {
    /// 完成率阈值（百分比）
    pub percent: f64,
    /// 观看秒数阈值
    pub seconds: f64,
    /// 去重窗口（小时）
    pub window_hours: i64,
}

impl ViewThresholds {
    /// 完成率或观看秒数任一达到阈值即满足计数条件
    pub fn is_met(&self, watch_duration: f64, completion_rate: f64) -> bool {
        completion_rate >= self.percent || watch_duration >= self.seconds
    }

    /// 去重窗口的起点，窗口小时数先限制在 1..=8760
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let hours = self.window_hours.clamp(1, MAX_DUPLICATE_WINDOW_HOURS);
        TimeDelta::try_hours(hours)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(now)
    }
}

/// 一次播放进度上报
#[derive(Debug, Clone)]
pub struct ViewProgress {
    pub video_id: Uuid,
    pub watch_duration: f64,
    pub completion_rate: f64,
    pub session_id: String,
    pub user_id: Option<Uuid>,
}

/// 会话日志写入结果
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub log: ViewLog,
    /// 本次上报是否新建了会话
    pub created: bool,
    /// 本次上报是否使播放数加一
    pub counted: bool,
    /// 写入后的视频播放数
    pub view_count: i64,
}

/// 播放进度上报的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct ViewProgressOutcome {
    pub view_counted: bool,
    pub view_count: i64,
    pub session_created: bool,
}

/// 保留清理的目标表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetentionTarget {
    /// 终身观看摘要，按 last_watched_at 判断
    #[default]
    ViewHistory,
    /// 按日观看记录，按 last_watched_at 判断
    DailyViewHistory,
    /// 原始会话日志，按 created_at 判断
    ViewLogs,
}

impl RetentionTarget {
    pub const ALL: [RetentionTarget; 3] = [
        RetentionTarget::ViewHistory,
        RetentionTarget::DailyViewHistory,
        RetentionTarget::ViewLogs,
    ];
}

impl fmt::Display for RetentionTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RetentionTarget::ViewHistory => write!(f, "VIEW_HISTORY"),
            RetentionTarget::DailyViewHistory => write!(f, "DAILY_VIEW_HISTORY"),
            RetentionTarget::ViewLogs => write!(f, "VIEW_LOGS"),
        }
    }
}

impl FromStr for RetentionTarget {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIEW_HISTORY" => Ok(RetentionTarget::ViewHistory),
            "DAILY_VIEW_HISTORY" => Ok(RetentionTarget::DailyViewHistory),
            "VIEW_LOGS" => Ok(RetentionTarget::ViewLogs),
            _ => Err(()),
        }
    }
}

/// 一次保留清理的执行报告
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub target: RetentionTarget,
    pub cutoff: DateTime<Utc>,
    pub deleted: u64,
    pub batches: u32,
    /// 为 false 表示因批次或时间上限提前结束，仍有待删除的行
    pub completed: bool,
    pub elapsed_ms: u64,
}
