// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const VIEW_PROGRESS_REPORTS_TOTAL: &str = "view_progress_reports_total";
pub const VIEW_COUNTS_INCREMENTED_TOTAL: &str = "view_counts_incremented_total";
pub const VIEW_HISTORY_WRITE_FAILURES_TOTAL: &str = "view_history_write_failures_total";
pub const SCHEDULED_TRANSITIONS_TOTAL: &str = "scheduled_transitions_total";
pub const RETENTION_ROWS_DELETED_TOTAL: &str = "retention_rows_deleted_total";
pub const RETENTION_RUN_DURATION_SECONDS: &str = "retention_run_duration_seconds";
pub const RATE_LIMITED_REQUESTS_TOTAL: &str = "rate_limited_requests_total";
pub const TRANSCODER_REQUESTS_TOTAL: &str = "transcoder_requests_total";

/// 初始化指标系统
///
/// 安装 Prometheus 导出器并注册应用指标的描述
///
/// # 参数
///
/// * `listen_addr` - 导出器 HTTP 监听地址
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics listen address {}: {}", listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!(
        VIEW_PROGRESS_REPORTS_TOTAL,
        "Total number of view progress reports received"
    );
    describe_counter!(
        VIEW_COUNTS_INCREMENTED_TOTAL,
        "Total number of public view count increments"
    );
    describe_counter!(
        VIEW_HISTORY_WRITE_FAILURES_TOTAL,
        "Total number of swallowed view history upsert failures"
    );
    describe_counter!(
        SCHEDULED_TRANSITIONS_TOTAL,
        "Total number of scheduled publish/unpublish transitions"
    );
    describe_counter!(
        RETENTION_ROWS_DELETED_TOTAL,
        "Total number of rows removed by retention cleanup"
    );
    describe_histogram!(
        RETENTION_RUN_DURATION_SECONDS,
        "Duration of retention cleanup runs in seconds"
    );
    describe_counter!(
        RATE_LIMITED_REQUESTS_TOTAL,
        "Total number of requests rejected by the rate limiter"
    );
    describe_counter!(
        TRANSCODER_REQUESTS_TOTAL,
        "Total number of requests sent to the GPU transcoder"
    );

    info!("Metrics exporter listening on {}", addr);
}
