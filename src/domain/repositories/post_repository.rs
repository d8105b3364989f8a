// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::page::PageRequest;
use crate::domain::models::post::{Post, PostFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 帖子仓库特质
///
/// 定义帖子及其标签关联的数据访问接口
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// 创建帖子并写入标签关联
    async fn create(&self, post: &Post, tag_ids: &[Uuid]) -> Result<Post, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepositoryError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError>;
    /// 按过滤条件分页查询，按创建时间倒序
    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<Post>, u64), RepositoryError>;
    /// 更新帖子，`tag_ids` 为 `Some` 时整体替换标签关联
    async fn update(&self, post: &Post, tag_ids: Option<&[Uuid]>)
        -> Result<Post, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
    async fn tag_ids(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepositoryError>;
    async fn count(&self) -> Result<u64, RepositoryError>;
    /// 公开所有到期的定时发布帖子
    ///
    /// # 返回值
    ///
    /// 本次实际完成状态切换的帖子ID
    async fn publish_due(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, RepositoryError>;
    /// 将所有到期的定时下线帖子转为私有
    async fn unpublish_due(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, RepositoryError>;
}
