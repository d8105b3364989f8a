// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::transcode_service::TranscodeService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 每轮最多刷新的任务数
const POLL_BATCH: u64 = 50;

/// 转码任务轮询器
///
/// 定期向 GPU 转码服务刷新进行中任务的状态
pub struct TranscodePoller {
    transcode: Arc<TranscodeService>,
    interval: Duration,
}

impl TranscodePoller {
    pub fn new(transcode: Arc<TranscodeService>, interval: Duration) -> Self {
        Self {
            transcode,
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!(
            "Transcode poller started (every {}s)",
            self.interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;

            match self.transcode.poll_in_flight(POLL_BATCH).await {
                Ok(0) => {}
                Ok(count) => debug!("Refreshed {} transcode jobs", count),
                Err(e) => error!("Failed to poll transcode jobs: {}", e),
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }
}
