// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::page::PageRequest;
use crate::domain::models::post::{Post, PostFilter, Visibility};
use crate::domain::repositories::post_repository::PostRepository;
use crate::infrastructure::database::entities::{post as post_entity, post_tag};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, Func, Query, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 帖子仓库实现
///
/// 基于SeaORM实现的帖子数据访问层，标签关联与帖子在同一事务内写入
#[derive(Clone)]
pub struct PostRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl PostRepositoryImpl {
    /// 创建新的帖子仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    ///
    /// # 返回值
    ///
    /// 返回新的帖子仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn filtered(filter: &PostFilter) -> Select<post_entity::Entity> {
        let mut query = post_entity::Entity::find();

        if let Some(visibility) = filter.visibility {
            query = query.filter(post_entity::Column::Visibility.eq(visibility.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(post_entity::Column::CategoryId.eq(category_id));
        }
        if let Some(tag_id) = filter.tag_id {
            query = query.filter(
                post_entity::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(post_tag::Entity)
                        .and_where(post_tag::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(q) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(post_entity::Column::Title.contains(q))
                    .add(post_entity::Column::Description.contains(q)),
            );
        }

        query
    }

    async fn replace_tags<C: ConnectionTrait>(
        conn: &C,
        post_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), RepositoryError> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(post_id))
            .exec(conn)
            .await?;

        let mut seen = Vec::with_capacity(tag_ids.len());
        for tag_id in tag_ids {
            if seen.contains(tag_id) {
                continue;
            }
            seen.push(*tag_id);
            post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(*tag_id),
            }
            .insert(conn)
            .await?;
        }
        Ok(())
    }
}

impl From<post_entity::Model> for Post {
    fn from(model: post_entity::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            title: model.title,
            description: model.description,
            visibility: model.visibility.parse().unwrap_or_default(),
            category_id: model.category_id,
            creator_id: model.creator_id,
            scheduled_publish_at: model.scheduled_publish_at.map(|t| t.with_timezone(&Utc)),
            scheduled_unpublish_at: model.scheduled_unpublish_at.map(|t| t.with_timezone(&Utc)),
            published_at: model.published_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<Post> for post_entity::ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            slug: Set(post.slug),
            title: Set(post.title),
            description: Set(post.description),
            visibility: Set(post.visibility.to_string()),
            category_id: Set(post.category_id),
            creator_id: Set(post.creator_id),
            scheduled_publish_at: Set(post.scheduled_publish_at.map(|t| t.fixed_offset())),
            scheduled_unpublish_at: Set(post.scheduled_unpublish_at.map(|t| t.fixed_offset())),
            published_at: Set(post.published_at.map(|t| t.fixed_offset())),
            created_at: Set(post.created_at.fixed_offset()),
            updated_at: Set(post.updated_at.fixed_offset()),
        }
    }
}

#[async_trait]
impl PostRepository for PostRepositoryImpl {
    async fn create(&self, post: &Post, tag_ids: &[Uuid]) -> Result<Post, RepositoryError> {
        let txn = self.db.begin().await?;

        let model: post_entity::ActiveModel = post.clone().into();
        let inserted = model.insert(&txn).await?;
        Self::replace_tags(&txn, inserted.id, tag_ids).await?;

        txn.commit().await?;
        Ok(inserted.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepositoryError> {
        let model = post_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Post::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepositoryError> {
        let model = post_entity::Entity::find()
            .filter(post_entity::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Post::from))
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<Post>, u64), RepositoryError> {
        let total = Self::filtered(filter).count(self.db.as_ref()).await?;
        let models = Self::filtered(filter)
            .order_by_desc(post_entity::Column::CreatedAt)
            .order_by_asc(post_entity::Column::Slug)
            .offset(page.offset())
            .limit(page.per_page)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Post::from).collect(), total))
    }

    async fn update(
        &self,
        post: &Post,
        tag_ids: Option<&[Uuid]>,
    ) -> Result<Post, RepositoryError> {
        let txn = self.db.begin().await?;

        let mut model: post_entity::ActiveModel = post.clone().into();
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.updated_at = Set(Utc::now().fixed_offset());
        let updated = model.update(&txn).await?;

        if let Some(tag_ids) = tag_ids {
            Self::replace_tags(&txn, updated.id, tag_ids).await?;
        }

        txn.commit().await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = post_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn tag_ids(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepositoryError> {
        let rows = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(|row| row.tag_id).collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(post_entity::Entity::find().count(self.db.as_ref()).await?)
    }

    async fn publish_due(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, RepositoryError> {
        let now: DateTime<FixedOffset> = now.fixed_offset();
        let public = Visibility::Public.to_string();

        let due = post_entity::Entity::find()
            .filter(post_entity::Column::ScheduledPublishAt.lte(now))
            .filter(post_entity::Column::Visibility.ne(public.clone()))
            .all(self.db.as_ref())
            .await?;

        let mut published = Vec::with_capacity(due.len());
        for post in due {
            let published_at: SimpleExpr = Func::coalesce([
                Expr::col(post_entity::Column::PublishedAt).into(),
                Expr::value(now),
            ])
            .into();

            // 条件更新保证并发调度下每个帖子只切换一次
            let result = post_entity::Entity::update_many()
                .col_expr(post_entity::Column::Visibility, Expr::value(public.clone()))
                .col_expr(post_entity::Column::PublishedAt, published_at)
                .col_expr(
                    post_entity::Column::ScheduledPublishAt,
                    Expr::value(Option::<DateTime<FixedOffset>>::None),
                )
                .col_expr(post_entity::Column::UpdatedAt, Expr::value(now))
                .filter(post_entity::Column::Id.eq(post.id))
                .filter(post_entity::Column::Visibility.ne(public.clone()))
                .filter(post_entity::Column::ScheduledPublishAt.lte(now))
                .exec(self.db.as_ref())
                .await?;

            if result.rows_affected == 1 {
                published.push(post.id);
            }
        }

        Ok(published)
    }

    async fn unpublish_due(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>, RepositoryError> {
        let now: DateTime<FixedOffset> = now.fixed_offset();
        let public = Visibility::Public.to_string();

        let due = post_entity::Entity::find()
            .filter(post_entity::Column::ScheduledUnpublishAt.lte(now))
            .filter(post_entity::Column::Visibility.eq(public.clone()))
            .all(self.db.as_ref())
            .await?;

        let mut unpublished = Vec::with_capacity(due.len());
        for post in due {
            let result = post_entity::Entity::update_many()
                .col_expr(
                    post_entity::Column::Visibility,
                    Expr::value(Visibility::Private.to_string()),
                )
                .col_expr(
                    post_entity::Column::ScheduledUnpublishAt,
                    Expr::value(Option::<DateTime<FixedOffset>>::None),
                )
                .col_expr(post_entity::Column::UpdatedAt, Expr::value(now))
                .filter(post_entity::Column::Id.eq(post.id))
                .filter(post_entity::Column::Visibility.eq(public.clone()))
                .filter(post_entity::Column::ScheduledUnpublishAt.lte(now))
                .exec(self.db.as_ref())
                .await?;

            if result.rows_affected == 1 {
                unpublished.push(post.id);
            }
        }

        Ok(unpublished)
    }
}
