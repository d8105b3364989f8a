// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult, RepositoryError};
use crate::domain::models::taxonomy::{is_valid_slug, Category, Tag};
use crate::domain::repositories::taxonomy_repository::{CategoryRepository, TagRepository};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// 分类的可编辑字段
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl CategoryInput {
    fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("カテゴリ名を入力してください"));
        }
        if !is_valid_slug(&self.slug) {
            return Err(DomainError::validation(
                "スラッグは小文字の英数字とハイフンのみ使用できます",
            ));
        }
        Ok(())
    }
}

/// 分类与标签服务
pub struct TaxonomyService {
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
}

impl TaxonomyService {
    pub fn new(categories: Arc<dyn CategoryRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { categories, tags }
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        Ok(self.categories.list().await?)
    }

    pub async fn create_category(&self, input: CategoryInput) -> DomainResult<Category> {
        input.validate()?;
        let category = Category {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            slug: input.slug,
            description: input.description,
            sort_order: input.sort_order,
            created_at: Utc::now(),
        };
        self.categories
            .create(&category)
            .await
            .map_err(category_conflict)
    }

    pub async fn update_category(&self, id: Uuid, input: CategoryInput) -> DomainResult<Category> {
        input.validate()?;
        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(category_not_found)?;

        category.name = input.name.trim().to_string();
        category.slug = input.slug;
        category.description = input.description;
        category.sort_order = input.sort_order;

        self.categories
            .update(&category)
            .await
            .map_err(category_conflict)
    }

    /// 删除分类，所属帖子的分类被置空
    pub async fn delete_category(&self, id: Uuid) -> DomainResult<()> {
        if !self.categories.delete(id).await? {
            return Err(category_not_found());
        }
        Ok(())
    }

    pub async fn list_tags(&self) -> DomainResult<Vec<Tag>> {
        Ok(self.tags.list().await?)
    }

    pub async fn create_tag(&self, name: &str) -> DomainResult<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("タグ名を入力してください"));
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.tags.create(&tag).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => DomainError::conflict("このタグは既に存在します"),
            other => other.into(),
        })
    }

    pub async fn delete_tag(&self, id: Uuid) -> DomainResult<()> {
        if !self.tags.delete(id).await? {
            return Err(DomainError::not_found("タグが見つかりません"));
        }
        Ok(())
    }

    /// 确认所有标签都存在，否则返回校验错误
    pub async fn ensure_tags_exist(&self, tag_ids: &[Uuid]) -> DomainResult<()> {
        for tag_id in tag_ids {
            if self.tags.find_by_id(*tag_id).await?.is_none() {
                return Err(DomainError::validation(format!(
                    "タグ {} が存在しません",
                    tag_id
                )));
            }
        }
        Ok(())
    }

    /// 确认分类存在，否则返回校验错误
    pub async fn ensure_category_exists(&self, category_id: Uuid) -> DomainResult<()> {
        match self.categories.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::validation("指定されたカテゴリが存在しません")),
        }
    }
}

fn category_not_found() -> DomainError {
    DomainError::not_found("カテゴリが見つかりません")
}

fn category_conflict(err: RepositoryError) -> DomainError {
    match err {
        RepositoryError::Conflict(_) => DomainError::conflict("このスラッグは既に使用されています"),
        RepositoryError::NotFound => category_not_found(),
        other => other.into(),
    }
}
