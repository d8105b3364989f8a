// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// 转码服务调用错误
#[derive(Error, Debug)]
pub enum TranscoderError {
    /// 转码服务返回非 2xx 状态
    #[error("Transcoder responded with status {status}: {body}")]
    Status { status: u16, body: String },
    /// 网络或解码失败
    #[error("Transcoder request failed: {0}")]
    Request(String),
}

/// 转码请求
#[derive(Debug, Clone, Serialize)]
pub struct TranscodeRequest {
    pub video_id: Uuid,
    pub input_path: String,
    pub output_dir: String,
}

/// 缩略图请求
#[derive(Debug, Clone, Serialize)]
pub struct ThumbnailRequest {
    pub video_id: Uuid,
    pub input_path: String,
    /// 截取位置（秒）
    pub timestamp: f64,
}

/// 转码服务返回的任务状态
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JobStatusReport {
    pub status: String,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// GPU 转码服务客户端接口
#[async_trait]
pub trait TranscoderClient: Send + Sync {
    /// 提交转码任务，返回外部任务ID
    async fn submit_transcode(&self, request: &TranscodeRequest)
        -> Result<String, TranscoderError>;
    /// 提交缩略图任务，返回外部任务ID
    async fn submit_thumbnail(&self, request: &ThumbnailRequest)
        -> Result<String, TranscoderError>;
    /// 查询外部任务状态
    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport, TranscoderError>;
}
