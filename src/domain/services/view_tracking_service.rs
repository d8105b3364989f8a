// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ViewTrackingSettings;
use crate::domain::errors::{DomainError, DomainResult, RepositoryError};
use crate::domain::models::page::{Page, PageRequest};
use crate::domain::models::setting::{
    MAX_DUPLICATE_WINDOW_HOURS, VIEW_COUNT_THRESHOLD_PERCENT, VIEW_COUNT_THRESHOLD_SECONDS,
    VIEW_DUPLICATE_WINDOW_HOURS,
};
use crate::domain::models::view::{ViewHistory, ViewProgress, ViewProgressOutcome, ViewThresholds};
use crate::domain::repositories::view_repository::ViewRepository;
use crate::domain::services::settings_service::SettingsService;
use crate::infrastructure::metrics::{
    VIEW_COUNTS_INCREMENTED_TOTAL, VIEW_HISTORY_WRITE_FAILURES_TOTAL, VIEW_PROGRESS_REPORTS_TOTAL,
};
use base64::prelude::*;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// 生成会话指纹
///
/// 客户端IP与 User-Agent 直接拼接后做 base64 编码；IP 缺失时使用 `unknown`
///
/// # 参数
///
/// * `client_ip` - 已解析的客户端IP
/// * `user_agent` - User-Agent 请求头
///
/// # 返回值
///
/// 会话指纹字符串
pub fn session_fingerprint(client_ip: Option<&str>, user_agent: Option<&str>) -> String {
    let ip = client_ip
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown");
    let user_agent = user_agent.unwrap_or_default();
    BASE64_STANDARD.encode(format!("{}{}", ip, user_agent))
}

/// 观看统计服务
///
/// 处理播放进度上报：会话去重、播放计数，以及登录用户的观看历史
pub struct ViewTrackingService {
    views: Arc<dyn ViewRepository>,
    settings: Arc<SettingsService>,
    fallback: ViewThresholds,
    report_offset: FixedOffset,
}

impl ViewTrackingService {
    /// 创建观看统计服务
    ///
    /// # 参数
    ///
    /// * `views` - 观看数据仓库
    /// * `settings` - 系统设置服务，阈值从中读取
    /// * `config` - 阈值后备值与每日历史的时区偏移
    pub fn new(
        views: Arc<dyn ViewRepository>,
        settings: Arc<SettingsService>,
        config: &ViewTrackingSettings,
    ) -> Self {
        let report_offset = config
            .report_utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(
                    "Invalid report offset {}h, falling back to UTC",
                    config.report_utc_offset_hours
                );
                Utc.fix()
            });

        Self {
            views,
            settings,
            fallback: ViewThresholds {
                percent: config.threshold_percent,
                seconds: config.threshold_seconds,
                window_hours: config
                    .duplicate_window_hours
                    .clamp(1, MAX_DUPLICATE_WINDOW_HOURS),
            },
            report_offset,
        }
    }

    /// 读取当前生效的计数阈值
    pub async fn thresholds(&self) -> ViewThresholds {
        ViewThresholds {
            percent: self
                .settings
                .get_or(VIEW_COUNT_THRESHOLD_PERCENT, self.fallback.percent)
                .await,
            seconds: self
                .settings
                .get_or(VIEW_COUNT_THRESHOLD_SECONDS, self.fallback.seconds)
                .await,
            window_hours: self.window_hours().await,
        }
    }

    /// 去重窗口，设置值超出 1..=8760 时使用后备值
    async fn window_hours(&self) -> i64 {
        let hours = self
            .settings
            .get_or(VIEW_DUPLICATE_WINDOW_HOURS, self.fallback.window_hours)
            .await;
        if (1..=MAX_DUPLICATE_WINDOW_HOURS).contains(&hours) {
            hours
        } else {
            warn!(
                "Duplicate window {}h is out of range, using {}h",
                hours, self.fallback.window_hours
            );
            self.fallback.window_hours
        }
    }

    /// 每日历史所属的日期
    pub fn report_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.report_offset).date_naive()
    }

    /// 处理一次播放进度上报
    ///
    /// # 参数
    ///
    /// * `progress` - 上报内容，包含会话指纹和可选的用户
    ///
    /// # 返回值
    ///
    /// * `Ok(ViewProgressOutcome)` - 是否计数、当前播放数、是否新建会话
    /// * `Err(DomainError)` - 输入非法、视频不存在或数据库错误
    pub async fn record_view_progress(
        &self,
        progress: ViewProgress,
    ) -> DomainResult<ViewProgressOutcome> {
        validate_progress(&progress)?;
        counter!(VIEW_PROGRESS_REPORTS_TOTAL).increment(1);

        let thresholds = self.thresholds().await;
        let now = Utc::now();

        let record = self
            .views
            .record_session(&progress, &thresholds, now)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => DomainError::not_found("動画が見つかりません"),
                other => other.into(),
            })?;

        if record.counted {
            counter!(VIEW_COUNTS_INCREMENTED_TOTAL).increment(1);
            debug!(
                "View counted for video {} (session log {}), count now {}",
                progress.video_id, record.log.id, record.view_count
            );
        }

        if let Some(user_id) = progress.user_id {
            self.record_histories(user_id, &progress, now).await;
        }

        Ok(ViewProgressOutcome {
            view_counted: record.counted,
            view_count: record.view_count,
            session_created: record.created,
        })
    }

    /// 写入终身与按日观看历史，失败只记录日志
    async fn record_histories(&self, user_id: Uuid, progress: &ViewProgress, now: DateTime<Utc>) {
        if let Err(e) = self
            .views
            .upsert_history(
                user_id,
                progress.video_id,
                progress.watch_duration,
                progress.completion_rate,
                now,
            )
            .await
        {
            counter!(VIEW_HISTORY_WRITE_FAILURES_TOTAL).increment(1);
            warn!(
                "Failed to update view history for user {} video {}: {}",
                user_id, progress.video_id, e
            );
        }

        if let Err(e) = self
            .views
            .upsert_daily_history(
                user_id,
                progress.video_id,
                self.report_date(now),
                progress.watch_duration,
                progress.completion_rate,
                now,
            )
            .await
        {
            counter!(VIEW_HISTORY_WRITE_FAILURES_TOTAL).increment(1);
            warn!(
                "Failed to update daily view history for user {} video {}: {}",
                user_id, progress.video_id, e
            );
        }
    }

    /// 用户的终身观看历史，最近观看在前
    pub async fn history(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> DomainResult<Page<ViewHistory>> {
        let (items, total) = self.views.list_history(user_id, page).await?;
        Ok(Page::new(items, total, page))
    }
}

fn validate_progress(progress: &ViewProgress) -> DomainResult<()> {
    if !progress.watch_duration.is_finite() || progress.watch_duration < 0.0 {
        return Err(DomainError::validation(
            "視聴時間は 0 以上の数値で指定してください",
        ));
    }
    if !progress.completion_rate.is_finite() || !(0.0..=100.0).contains(&progress.completion_rate)
    {
        return Err(DomainError::validation(
            "視聴完了率は 0〜100 の数値で指定してください",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "view_tracking_service_test.rs"]
mod view_tracking_service_test;
