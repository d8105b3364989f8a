// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 计入播放数所需完成率（百分比）
pub const VIEW_COUNT_THRESHOLD_PERCENT: &str = "view_count_threshold_percent";
/// 计入播放数所需观看秒数
pub const VIEW_COUNT_THRESHOLD_SECONDS: &str = "view_count_threshold_seconds";
/// 播放去重时间窗口（小时）
pub const VIEW_DUPLICATE_WINDOW_HOURS: &str = "view_duplicate_window_hours";
/// 观看历史保留天数
pub const VIEW_HISTORY_RETENTION_DAYS: &str = "view_history_retention_days";

/// 去重窗口上限（一年）
pub const MAX_DUPLICATE_WINDOW_HOURS: i64 = 8760;
/// 保留天数上限
pub const MAX_RETENTION_DAYS: i64 = 36500;

/// 可在运行时修改的系统设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// 校验已知数值型设置的取值
///
/// 未知键原样接受
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        VIEW_COUNT_THRESHOLD_PERCENT => match value.trim().parse::<f64>() {
            Ok(v) if (0.0..=100.0).contains(&v) => Ok(()),
            _ => Err(format!("{} は 0〜100 の数値で指定してください", key)),
        },
        VIEW_COUNT_THRESHOLD_SECONDS => match value.trim().parse::<f64>() {
            Ok(v) if v >= 0.0 && v.is_finite() => Ok(()),
            _ => Err(format!("{} は 0 以上の数値で指定してください", key)),
        },
        VIEW_DUPLICATE_WINDOW_HOURS => check_int_range(key, value, MAX_DUPLICATE_WINDOW_HOURS),
        VIEW_HISTORY_RETENTION_DAYS => check_int_range(key, value, MAX_RETENTION_DAYS),
        _ => Ok(()),
    }
}

fn check_int_range(key: &str, value: &str, max: i64) -> Result<(), String> {
    match value.trim().parse::<i64>() {
        Ok(v) if (1..=max).contains(&v) => Ok(()),
        _ => Err(format!("{} は 1〜{} の整数で指定してください", key, max)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_settings_are_range_checked() {
        assert!(validate_setting(VIEW_COUNT_THRESHOLD_PERCENT, "50").is_ok());
        assert!(validate_setting(VIEW_COUNT_THRESHOLD_PERCENT, "101").is_err());
        assert!(validate_setting(VIEW_COUNT_THRESHOLD_SECONDS, "-1").is_err());
        assert!(validate_setting(VIEW_DUPLICATE_WINDOW_HOURS, "0").is_err());
        assert!(validate_setting(VIEW_HISTORY_RETENTION_DAYS, "abc").is_err());
        assert!(validate_setting("site_title", "anything").is_ok());
    }

    #[test]
    fn test_window_and_retention_have_upper_bounds() {
        assert!(validate_setting(VIEW_DUPLICATE_WINDOW_HOURS, "8760").is_ok());
        assert!(validate_setting(VIEW_DUPLICATE_WINDOW_HOURS, "8761").is_err());
        assert!(validate_setting(VIEW_DUPLICATE_WINDOW_HOURS, "10000000000").is_err());
        assert!(validate_setting(VIEW_HISTORY_RETENTION_DAYS, "36500").is_ok());
        assert!(validate_setting(VIEW_HISTORY_RETENTION_DAYS, "200000000").is_err());
    }
}
