// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::taxonomy::{Category, Tag};
use async_trait::async_trait;
use uuid::Uuid;

/// 分类仓库特质
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: &Category) -> Result<Category, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepositoryError>;
    /// 按 sort_order、名称排序列出全部分类
    async fn list(&self) -> Result<Vec<Category>, RepositoryError>;
    async fn update(&self, category: &Category) -> Result<Category, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

/// 标签仓库特质
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn create(&self, tag: &Tag) -> Result<Tag, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Tag>, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}
