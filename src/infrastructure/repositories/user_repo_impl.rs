// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::page::PageRequest;
use crate::domain::models::user::User;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::database::entities::user as user_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 用户仓库实现
///
/// 基于SeaORM实现的用户数据访问层
#[derive(Clone)]
pub struct UserRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    /// 创建新的用户仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user_entity::Model> for User {
    fn from(model: user_entity::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            password_hash: model.password_hash,
            role: model.role.parse().unwrap_or_default(),
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<User> for user_entity::ActiveModel {
    fn from(user: User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            display_name: Set(user.display_name),
            password_hash: Set(user.password_hash),
            role: Set(user.role.to_string()),
            is_active: Set(user.is_active),
            created_at: Set(user.created_at.fixed_offset()),
            updated_at: Set(user.updated_at.fixed_offset()),
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let model: user_entity::ActiveModel = user.clone().into();
        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let model = user_entity::Entity::find()
            .filter(user_entity::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(User::from))
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), RepositoryError> {
        let total = user_entity::Entity::find().count(self.db.as_ref()).await?;
        let models = user_entity::Entity::find()
            .order_by_asc(user_entity::Column::CreatedAt)
            .order_by_asc(user_entity::Column::Username)
            .offset(page.offset())
            .limit(page.per_page)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let mut model: user_entity::ActiveModel = user.clone().into();
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.updated_at = Set(Utc::now().fixed_offset());

        let updated = model.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = user_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(user_entity::Entity::find().count(self.db.as_ref()).await?)
    }
}
