// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::domain::errors::DomainError;
use crate::domain::models::view::ViewProgress;

/// 接受数字或数字字符串，其他情况视为缺失
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// 播放进度上报
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ViewProgressRequestDto {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub watch_duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub completion_rate: Option<f64>,
}

impl ViewProgressRequestDto {
    /// 组合成领域输入，数值缺失或无法解析时返回校验错误
    pub fn into_progress(
        self,
        video_id: Uuid,
        session_id: String,
        user_id: Option<Uuid>,
    ) -> Result<ViewProgress, DomainError> {
        let watch_duration = self.watch_duration.ok_or_else(|| {
            DomainError::validation("視聴時間は 0 以上の数値で指定してください")
        })?;
        let completion_rate = self.completion_rate.ok_or_else(|| {
            DomainError::validation("視聴完了率は 0〜100 の数値で指定してください")
        })?;

        Ok(ViewProgress {
            video_id,
            watch_duration,
            completion_rate,
            session_id,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_strings_are_accepted() {
        let dto: ViewProgressRequestDto =
            serde_json::from_value(json!({ "watch_duration": "12.5", "completion_rate": 40 }))
                .unwrap();
        assert_eq!(dto.watch_duration, Some(12.5));
        assert_eq!(dto.completion_rate, Some(40.0));
    }

    #[test]
    fn test_garbage_becomes_validation_error() {
        let dto: ViewProgressRequestDto =
            serde_json::from_value(json!({ "watch_duration": "abc", "completion_rate": true }))
                .unwrap();
        assert!(dto.watch_duration.is_none());
        let err = dto
            .into_progress(Uuid::new_v4(), "fp".to_string(), None)
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
