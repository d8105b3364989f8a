// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::setting::{validate_setting, SystemSetting};
use crate::domain::repositories::setting_repository::SettingRepository;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// 系统设置服务
///
/// 管理端读写键值设置，并为其他服务提供带后备值的类型化读取
pub struct SettingsService {
    repo: Arc<dyn SettingRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> DomainResult<Vec<SystemSetting>> {
        Ok(self.repo.list().await?)
    }

    /// 写入一个设置，已知数值键会先做范围校验
    ///
    /// # 参数
    ///
    /// * `key` - 设置键
    /// * `value` - 新值
    /// * `description` - 可选描述，为空时保留原描述
    pub async fn update(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> DomainResult<SystemSetting> {
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::validation("設定キーを指定してください"));
        }
        validate_setting(key, value).map_err(DomainError::Validation)?;

        let saved = self.repo.upsert(key, value.trim(), description).await?;
        debug!("System setting {} updated", key);
        Ok(saved)
    }

    /// 读取并解析设置，缺失、无法解析或读取失败时返回 `fallback`
    pub async fn get_or<T>(&self, key: &str, fallback: T) -> T
    where
        T: FromStr + Send,
    {
        match self.repo.get(key).await {
            Ok(Some(setting)) => match setting.value.trim().parse::<T>() {
                Ok(value) => value,
                Err(_) => {
                    warn!(
                        "System setting {} has unparsable value {:?}, using fallback",
                        key, setting.value
                    );
                    fallback
                }
            },
            Ok(None) => fallback,
            Err(e) => {
                warn!("Failed to read system setting {}: {}, using fallback", key, e);
                fallback
            }
        }
    }
}
