// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::view::RetentionTarget;
use crate::domain::services::retention_service::RetentionService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 观看历史保留清理工作器
///
/// 定期对所有清理目标执行一轮有上限的批量删除
pub struct RetentionWorker {
    retention: Arc<RetentionService>,
    interval: Duration,
}

impl RetentionWorker {
    pub fn new(retention: Arc<RetentionService>, interval: Duration) -> Self {
        Self {
            retention,
            interval: interval.max(Duration::from_secs(60)),
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!(
            "Retention worker started (every {}s)",
            self.interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;
            let deleted = self.run_once().await;
            if deleted > 0 {
                info!("Retention worker removed {} rows", deleted);
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 依次清理每个目标，单个目标失败不影响其他目标
    async fn run_once(&self) -> u64 {
        let mut deleted = 0;
        for target in RetentionTarget::ALL {
            match self.retention.cleanup(target, None).await {
                Ok(report) => deleted += report.deleted,
                Err(e) => error!("Retention cleanup of {} failed: {}", target, e),
            }
        }
        deleted
    }
}
