// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::video::TranscodeStatus;

/// 提交给 GPU 转码服务的任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeJob {
    pub id: Uuid,
    pub video_id: Uuid,
    /// 转码服务返回的任务ID，提交失败时为空
    pub external_job_id: Option<String>,
    pub kind: TranscodeKind,
    pub status: TranscodeStatus,
    /// 0-100
    pub progress: i32,
    pub output_path: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TranscodeKind {
    Transcode,
    Thumbnail,
}

impl fmt::Display for TranscodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TranscodeKind::Transcode => write!(f, "TRANSCODE"),
            TranscodeKind::Thumbnail => write!(f, "THUMBNAIL"),
        }
    }
}

impl FromStr for TranscodeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRANSCODE" => Ok(TranscodeKind::Transcode),
            "THUMBNAIL" => Ok(TranscodeKind::Thumbnail),
            _ => Err(()),
        }
    }
}
