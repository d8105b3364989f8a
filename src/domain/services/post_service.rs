// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult, RepositoryError};
use crate::domain::models::page::{Page, PageRequest};
use crate::domain::models::post::{Post, PostFilter, Visibility};
use crate::domain::models::taxonomy::is_valid_slug;
use crate::domain::models::user::{CurrentUser, UserRole};
use crate::domain::models::video::Video;
use crate::domain::repositories::post_repository::PostRepository;
use crate::domain::repositories::video_repository::VideoRepository;
use crate::domain::services::taxonomy_service::TaxonomyService;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 帖子的可编辑字段，更新时整体替换
#[derive(Debug, Clone)]
pub struct PostInput {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
    pub scheduled_publish_at: Option<DateTime<Utc>>,
    pub scheduled_unpublish_at: Option<DateTime<Utc>>,
}

/// 帖子详情，附带标签与视频
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub tag_ids: Vec<Uuid>,
    pub videos: Vec<Video>,
}

pub(crate) fn post_not_found() -> DomainError {
    DomainError::not_found("投稿が見つかりません")
}

fn map_post_error(err: RepositoryError) -> DomainError {
    match err {
        RepositoryError::Conflict(_) => DomainError::conflict("このスラッグは既に使用されています"),
        RepositoryError::NotFound => post_not_found(),
        other => other.into(),
    }
}

/// 帖子服务
///
/// 匿名用户和 VIEWER 只能看到公开帖子，不可见的帖子一律按不存在处理
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    videos: Arc<dyn VideoRepository>,
    taxonomy: Arc<TaxonomyService>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        videos: Arc<dyn VideoRepository>,
        taxonomy: Arc<TaxonomyService>,
    ) -> Self {
        Self {
            posts,
            videos,
            taxonomy,
        }
    }

    /// 分页列出调用者可见的帖子
    ///
    /// # 参数
    ///
    /// * `viewer` - 调用者角色，匿名为 `None`
    /// * `filter` - 过滤条件，非内容管理员的可见性条件被强制为公开
    /// * `page` - 分页参数
    pub async fn list(
        &self,
        viewer: Option<UserRole>,
        mut filter: PostFilter,
        page: PageRequest,
    ) -> DomainResult<Page<Post>> {
        if !viewer.is_some_and(UserRole::can_manage_content) {
            filter.visibility = Some(Visibility::Public);
        }
        let (items, total) = self.posts.list(&filter, page).await?;
        Ok(Page::new(items, total, page))
    }

    /// 按 slug 读取帖子详情
    pub async fn get_by_slug(&self, viewer: Option<UserRole>, slug: &str) -> DomainResult<PostDetail> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .filter(|post| post.visibility.visible_to(viewer))
            .ok_or_else(post_not_found)?;
        self.detail(post).await
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<PostDetail> {
        let post = self.posts.find_by_id(id).await?.ok_or_else(post_not_found)?;
        self.detail(post).await
    }

    async fn detail(&self, post: Post) -> DomainResult<PostDetail> {
        let tag_ids = self.posts.tag_ids(post.id).await?;
        let videos = self.videos.list_by_post(post.id).await?;
        Ok(PostDetail {
            post,
            tag_ids,
            videos,
        })
    }

    async fn validate(&self, input: &PostInput) -> DomainResult<()> {
        if !is_valid_slug(&input.slug) {
            return Err(DomainError::validation(
                "スラッグは小文字の英数字とハイフンのみ使用できます",
            ));
        }
        if input.title.trim().is_empty() {
            return Err(DomainError::validation("タイトルを入力してください"));
        }
        if let (Some(publish), Some(unpublish)) =
            (input.scheduled_publish_at, input.scheduled_unpublish_at)
        {
            if unpublish <= publish {
                return Err(DomainError::validation(
                    "公開終了日時は公開開始日時より後に設定してください",
                ));
            }
        }
        if let Some(category_id) = input.category_id {
            self.taxonomy.ensure_category_exists(category_id).await?;
        }
        self.taxonomy.ensure_tags_exist(&input.tag_ids).await
    }

    /// 创建帖子
    ///
    /// 直接以公开状态创建时记录发布时间
    pub async fn create(&self, actor: &CurrentUser, input: PostInput) -> DomainResult<PostDetail> {
        self.validate(&input).await?;

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            slug: input.slug,
            title: input.title.trim().to_string(),
            description: input.description,
            visibility: input.visibility,
            category_id: input.category_id,
            creator_id: actor.id,
            scheduled_publish_at: input.scheduled_publish_at,
            scheduled_unpublish_at: input.scheduled_unpublish_at,
            published_at: (input.visibility == Visibility::Public).then_some(now),
            created_at: now,
            updated_at: now,
        };

        let created = self
            .posts
            .create(&post, &input.tag_ids)
            .await
            .map_err(map_post_error)?;
        info!("Post {} created by {}", created.slug, actor.username);
        self.detail(created).await
    }

    /// 更新帖子
    pub async fn update(&self, id: Uuid, input: PostInput) -> DomainResult<PostDetail> {
        self.validate(&input).await?;
        let mut post = self.posts.find_by_id(id).await?.ok_or_else(post_not_found)?;

        if input.visibility == Visibility::Public && post.published_at.is_none() {
            post.published_at = Some(Utc::now());
        }
        post.slug = input.slug;
        post.title = input.title.trim().to_string();
        post.description = input.description;
        post.visibility = input.visibility;
        post.category_id = input.category_id;
        post.scheduled_publish_at = input.scheduled_publish_at;
        post.scheduled_unpublish_at = input.scheduled_unpublish_at;

        let updated = self
            .posts
            .update(&post, Some(&input.tag_ids))
            .await
            .map_err(map_post_error)?;
        self.detail(updated).await
    }

    /// 删除帖子，视频、观看记录与播放列表条目级联删除
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if !self.posts.delete(id).await? {
            return Err(post_not_found());
        }
        info!("Post {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::fixtures::{create_user, setup_db};
    use crate::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
    use crate::infrastructure::repositories::taxonomy_repo_impl::{
        CategoryRepositoryImpl, TagRepositoryImpl,
    };
    use crate::infrastructure::repositories::video_repo_impl::VideoRepositoryImpl;
    use chrono::Duration;

    struct Fixture {
        service: PostService,
        taxonomy: Arc<TaxonomyService>,
        curator: CurrentUser,
    }

    async fn fixture() -> Fixture {
        let db = setup_db().await;
        let curator_id = create_user(&db, "curator", UserRole::Curator).await;
        let taxonomy = Arc::new(TaxonomyService::new(
            Arc::new(CategoryRepositoryImpl::new(db.clone())),
            Arc::new(TagRepositoryImpl::new(db.clone())),
        ));
        let service = PostService::new(
            Arc::new(PostRepositoryImpl::new(db.clone())),
            Arc::new(VideoRepositoryImpl::new(db)),
            taxonomy.clone(),
        );
        Fixture {
            service,
            taxonomy,
            curator: CurrentUser {
                id: curator_id,
                username: "curator".to_string(),
                role: UserRole::Curator,
            },
        }
    }

    fn input(slug: &str, visibility: Visibility) -> PostInput {
        PostInput {
            slug: slug.to_string(),
            title: format!("Title {}", slug),
            description: None,
            visibility,
            category_id: None,
            tag_ids: Vec::new(),
            scheduled_publish_at: None,
            scheduled_unpublish_at: None,
        }
    }

    #[tokio::test]
    async fn test_visibility_rules_for_listing_and_lookup() {
        let f = fixture().await;
        f.service
            .create(&f.curator, input("public-post", Visibility::Public))
            .await
            .unwrap();
        f.service
            .create(&f.curator, input("draft-post", Visibility::Draft))
            .await
            .unwrap();

        let filter = PostFilter {
            visibility: Some(Visibility::Draft),
            ..Default::default()
        };
        let anonymous = f
            .service
            .list(None, filter.clone(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(anonymous.total, 1);
        assert_eq!(anonymous.items[0].slug, "public-post");

        let curator = f
            .service
            .list(Some(UserRole::Curator), filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(curator.total, 1);
        assert_eq!(curator.items[0].slug, "draft-post");

        let err = f
            .service
            .get_by_slug(Some(UserRole::Viewer), "draft-post")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(f
            .service
            .get_by_slug(Some(UserRole::Admin), "draft-post")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_schedule_order_and_tags_are_validated() {
        let f = fixture().await;
        let now = Utc::now();

        let mut bad = input("scheduled", Visibility::Draft);
        bad.scheduled_publish_at = Some(now + Duration::days(2));
        bad.scheduled_unpublish_at = Some(now + Duration::days(1));
        let err = f.service.create(&f.curator, bad).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut unknown_tag = input("tagged", Visibility::Draft);
        unknown_tag.tag_ids = vec![Uuid::new_v4()];
        let err = f.service.create(&f.curator, unknown_tag).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let tag = f.taxonomy.create_tag("compliance").await.unwrap();
        let mut tagged = input("tagged", Visibility::Draft);
        tagged.tag_ids = vec![tag.id, tag.id];
        let created = f.service.create(&f.curator, tagged).await.unwrap();
        assert_eq!(created.tag_ids, vec![tag.id]);
        assert!(created.post.published_at.is_none());
    }

    #[tokio::test]
    async fn test_update_publishes_and_rejects_duplicate_slug() {
        let f = fixture().await;
        let first = f
            .service
            .create(&f.curator, input("first", Visibility::Draft))
            .await
            .unwrap();
        f.service
            .create(&f.curator, input("second", Visibility::Draft))
            .await
            .unwrap();

        let updated = f
            .service
            .update(first.post.id, input("first", Visibility::Public))
            .await
            .unwrap();
        assert!(updated.post.published_at.is_some());

        let err = f
            .service
            .update(first.post.id, input("second", Visibility::Public))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        f.service.delete(first.post.id).await.unwrap();
        let err = f.service.delete(first.post.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
