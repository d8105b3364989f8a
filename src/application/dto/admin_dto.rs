// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

use crate::domain::errors::DomainError;
use crate::domain::models::view::RetentionTarget;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingRequestDto {
    #[validate(length(min = 1, max = 100, message = "設定キーは 1〜100 文字で入力してください"))]
    pub key: String,
    #[validate(length(max = 1000, message = "設定値は 1000 文字以内で入力してください"))]
    pub value: String,
    pub description: Option<String>,
}

/// 保留清理参数，JSON 请求体与查询字符串共用
#[derive(Debug, Default, Deserialize)]
pub struct CleanupRequestDto {
    pub target: Option<String>,
    pub retention_days: Option<i64>,
}

impl CleanupRequestDto {
    pub fn target(&self) -> Result<RetentionTarget, DomainError> {
        match self.target.as_deref().map(str::trim) {
            None | Some("") => Ok(RetentionTarget::default()),
            Some(raw) => raw.to_ascii_uppercase().parse().map_err(|_| {
                DomainError::validation(
                    "対象は VIEW_HISTORY・DAILY_VIEW_HISTORY・VIEW_LOGS のいずれかを指定してください",
                )
            }),
        }
    }
}

/// 统计天数查询参数
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    30
}
