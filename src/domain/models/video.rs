// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 视频实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    /// 所属帖子
    pub post_id: Uuid,
    pub title: String,
    /// 原始文件路径，由转码服务读取
    pub file_path: String,
    pub duration_seconds: Option<f64>,
    pub thumbnail_path: Option<String>,
    /// 公开播放数，每个会话指纹在去重窗口内最多计一次
    pub view_count: i64,
    pub transcode_status: TranscodeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 转码状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TranscodeStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TranscodeStatus {
    /// 是否仍需轮询转码服务
    pub fn is_in_flight(self) -> bool {
        matches!(self, TranscodeStatus::Pending | TranscodeStatus::Processing)
    }
}

impl fmt::Display for TranscodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TranscodeStatus::Pending => write!(f, "PENDING"),
            TranscodeStatus::Processing => write!(f, "PROCESSING"),
            TranscodeStatus::Completed => write!(f, "COMPLETED"),
            TranscodeStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for TranscodeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" | "QUEUED" => Ok(TranscodeStatus::Pending),
            "PROCESSING" | "RUNNING" => Ok(TranscodeStatus::Processing),
            "COMPLETED" | "DONE" => Ok(TranscodeStatus::Completed),
            "FAILED" | "ERROR" => Ok(TranscodeStatus::Failed),
            _ => Err(()),
        }
    }
}
