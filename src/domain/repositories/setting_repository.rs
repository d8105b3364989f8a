// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::setting::SystemSetting;
use async_trait::async_trait;

/// 系统设置仓库特质
#[async_trait]
pub trait SettingRepository: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<SystemSetting>, RepositoryError>;
    async fn list(&self) -> Result<Vec<SystemSetting>, RepositoryError>;
    /// 写入设置，已存在时覆盖值；`description` 为空时保留原描述
    async fn upsert(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<SystemSetting, RepositoryError>;
}
