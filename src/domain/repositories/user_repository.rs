// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::page::PageRequest;
use crate::domain::models::user::User;
use async_trait::async_trait;
use uuid::Uuid;

/// 用户仓库特质
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，用户名重复时返回 `Conflict`
    async fn create(&self, user: &User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    /// 按创建时间分页列出用户
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), RepositoryError>;
    async fn update(&self, user: &User) -> Result<User, RepositoryError>;
    /// 删除用户，返回是否存在该用户
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
}
