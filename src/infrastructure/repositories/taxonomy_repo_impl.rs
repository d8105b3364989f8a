// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::taxonomy::{Category, Tag};
use crate::domain::repositories::taxonomy_repository::{CategoryRepository, TagRepository};
use crate::infrastructure::database::entities::{category as category_entity, tag as tag_entity};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use uuid::Uuid;

/// 分类仓库实现
#[derive(Clone)]
pub struct CategoryRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<category_entity::Model> for Category {
    fn from(model: category_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            sort_order: model.sort_order,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<Category> for category_entity::ActiveModel {
    fn from(category: Category) -> Self {
        Self {
            id: Set(category.id),
            name: Set(category.name),
            slug: Set(category.slug),
            description: Set(category.description),
            sort_order: Set(category.sort_order),
            created_at: Set(category.created_at.fixed_offset()),
        }
    }
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn create(&self, category: &Category) -> Result<Category, RepositoryError> {
        let model: category_entity::ActiveModel = category.clone().into();
        Ok(model.insert(self.db.as_ref()).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepositoryError> {
        let model = category_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Category::from))
    }

    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let models = category_entity::Entity::find()
            .order_by_asc(category_entity::Column::SortOrder)
            .order_by_asc(category_entity::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn update(&self, category: &Category) -> Result<Category, RepositoryError> {
        let mut model: category_entity::ActiveModel = category.clone().into();
        model.created_at = sea_orm::ActiveValue::NotSet;
        Ok(model.update(self.db.as_ref()).await?.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = category_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

/// 标签仓库实现
#[derive(Clone)]
pub struct TagRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl TagRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<tag_entity::Model> for Tag {
    fn from(model: tag_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl TagRepository for TagRepositoryImpl {
    async fn create(&self, tag: &Tag) -> Result<Tag, RepositoryError> {
        let model = tag_entity::ActiveModel {
            id: Set(tag.id),
            name: Set(tag.name.clone()),
            created_at: Set(tag.created_at.fixed_offset()),
        };
        Ok(model.insert(self.db.as_ref()).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepositoryError> {
        let model = tag_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Tag::from))
    }

    async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let models = tag_entity::Entity::find()
            .order_by_asc(tag_entity::Column::Name)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Tag::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = tag_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
