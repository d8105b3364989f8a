// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::setting::SystemSetting;
use crate::domain::repositories::setting_repository::SettingRepository;
use crate::infrastructure::database::entities::system_setting;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use std::sync::Arc;

/// 系统设置仓库实现
#[derive(Clone)]
pub struct SettingRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl SettingRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<system_setting::Model> for SystemSetting {
    fn from(model: system_setting::Model) -> Self {
        Self {
            key: model.key,
            value: model.value,
            description: model.description,
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl SettingRepository for SettingRepositoryImpl {
    async fn get(&self, key: &str) -> Result<Option<SystemSetting>, RepositoryError> {
        let model = system_setting::Entity::find_by_id(key.to_string())
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(SystemSetting::from))
    }

    async fn list(&self) -> Result<Vec<SystemSetting>, RepositoryError> {
        let models = system_setting::Entity::find()
            .order_by_asc(system_setting::Column::Key)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(SystemSetting::from).collect())
    }

    async fn upsert(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<SystemSetting, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let existing = system_setting::Entity::find_by_id(key.to_string())
            .one(self.db.as_ref())
            .await?;

        let saved = match existing {
            Some(model) => {
                let mut active: system_setting::ActiveModel = model.into();
                active.value = Set(value.to_string());
                if let Some(description) = description {
                    active.description = Set(Some(description.to_string()));
                }
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?
            }
            None => {
                system_setting::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(value.to_string()),
                    description: Set(description.map(str::to_string)),
                    updated_at: Set(now),
                }
                .insert(self.db.as_ref())
                .await?
            }
        };

        Ok(saved.into())
    }
}
