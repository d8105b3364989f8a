// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::RepositoryError;
use crate::domain::models::page::PageRequest;
use crate::domain::models::playlist::{Playlist, PlaylistEntry};
use crate::domain::models::post::Visibility;
use crate::domain::models::video::Video;
use crate::domain::repositories::playlist_repository::{PlaylistRepository, PlaylistScope};
use crate::infrastructure::database::entities::{
    playlist as playlist_entity, playlist_video, post as post_entity, video as video_entity,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// 播放列表仓库实现
///
/// 列表项位置从 0 开始连续编号，插入和移除在事务内重排
#[derive(Clone)]
pub struct PlaylistRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl PlaylistRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn scope_condition(scope: PlaylistScope) -> Condition {
        let public = playlist_entity::Column::Visibility.eq(Visibility::Public.to_string());
        match scope {
            PlaylistScope::All => Condition::all(),
            PlaylistScope::PublicOnly => Condition::all().add(public),
            PlaylistScope::PublicOrOwnedBy(user_id) => Condition::any()
                .add(public)
                .add(playlist_entity::Column::CreatorId.eq(user_id)),
        }
    }
}

impl From<playlist_entity::Model> for Playlist {
    fn from(model: playlist_entity::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            visibility: model.visibility.parse().unwrap_or_default(),
            creator_id: model.creator_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<Playlist> for playlist_entity::ActiveModel {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: Set(playlist.id),
            title: Set(playlist.title),
            description: Set(playlist.description),
            visibility: Set(playlist.visibility.to_string()),
            creator_id: Set(playlist.creator_id),
            created_at: Set(playlist.created_at.fixed_offset()),
            updated_at: Set(playlist.updated_at.fixed_offset()),
        }
    }
}

#[async_trait]
impl PlaylistRepository for PlaylistRepositoryImpl {
    async fn create(&self, playlist: &Playlist) -> Result<Playlist, RepositoryError> {
        let model: playlist_entity::ActiveModel = playlist.clone().into();
        Ok(model.insert(self.db.as_ref()).await?.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>, RepositoryError> {
        let model = playlist_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Playlist::from))
    }

    async fn list(
        &self,
        scope: PlaylistScope,
        page: PageRequest,
    ) -> Result<(Vec<Playlist>, u64), RepositoryError> {
        let total = playlist_entity::Entity::find()
            .filter(Self::scope_condition(scope))
            .count(self.db.as_ref())
            .await?;
        let models = playlist_entity::Entity::find()
            .filter(Self::scope_condition(scope))
            .order_by_desc(playlist_entity::Column::UpdatedAt)
            .offset(page.offset())
            .limit(page.per_page)
            .all(self.db.as_ref())
            .await?;

        Ok((models.into_iter().map(Playlist::from).collect(), total))
    }

    async fn update(&self, playlist: &Playlist) -> Result<Playlist, RepositoryError> {
        let mut model: playlist_entity::ActiveModel = playlist.clone().into();
        model.created_at = sea_orm::ActiveValue::NotSet;
        model.updated_at = Set(Utc::now().fixed_offset());
        Ok(model.update(self.db.as_ref()).await?.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = playlist_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn add_video(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        position: Option<i32>,
    ) -> Result<i32, RepositoryError> {
        let txn = self.db.begin().await?;

        let existing = playlist_video::Entity::find_by_id((playlist_id, video_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "video {} already in playlist {}",
                video_id, playlist_id
            )));
        }

        let len = playlist_video::Entity::find()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .count(&txn)
            .await? as i32;
        let target = position.map(|p| p.clamp(0, len)).unwrap_or(len);

        if target < len {
            playlist_video::Entity::update_many()
                .col_expr(
                    playlist_video::Column::Position,
                    Expr::col(playlist_video::Column::Position).add(1),
                )
                .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
                .filter(playlist_video::Column::Position.gte(target))
                .exec(&txn)
                .await?;
        }

        playlist_video::ActiveModel {
            playlist_id: Set(playlist_id),
            video_id: Set(video_id),
            position: Set(target),
        }
        .insert(&txn)
        .await?;

        playlist_entity::Entity::update_many()
            .col_expr(
                playlist_entity::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(playlist_entity::Column::Id.eq(playlist_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(target)
    }

    async fn remove_video(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
    ) -> Result<bool, RepositoryError> {
        let txn = self.db.begin().await?;

        let Some(entry) = playlist_video::Entity::find_by_id((playlist_id, video_id))
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        playlist_video::Entity::delete_by_id((playlist_id, video_id))
            .exec(&txn)
            .await?;
        playlist_video::Entity::update_many()
            .col_expr(
                playlist_video::Column::Position,
                Expr::col(playlist_video::Column::Position).sub(1),
            )
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .filter(playlist_video::Column::Position.gt(entry.position))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(true)
    }

    async fn entries(
        &self,
        playlist_id: Uuid,
        visibility: Option<Visibility>,
    ) -> Result<Vec<PlaylistEntry>, RepositoryError> {
        let rows = playlist_video::Entity::find()
            .filter(playlist_video::Column::PlaylistId.eq(playlist_id))
            .order_by_asc(playlist_video::Column::Position)
            .find_also_related(video_entity::Entity)
            .all(self.db.as_ref())
            .await?;

        let allowed_posts: Option<HashSet<Uuid>> = match visibility {
            Some(visibility) => {
                let post_ids: Vec<Uuid> = rows
                    .iter()
                    .filter_map(|(_, video)| video.as_ref().map(|v| v.post_id))
                    .collect();
                let posts = post_entity::Entity::find()
                    .filter(post_entity::Column::Id.is_in(post_ids))
                    .filter(post_entity::Column::Visibility.eq(visibility.to_string()))
                    .all(self.db.as_ref())
                    .await?;
                Some(posts.into_iter().map(|p| p.id).collect())
            }
            None => None,
        };

        Ok(rows
            .into_iter()
            .filter_map(|(entry, video)| video.map(|v| (entry.position, v)))
            .filter(|(_, video)| {
                allowed_posts
                    .as_ref()
                    .map_or(true, |allowed| allowed.contains(&video.post_id))
            })
            .map(|(position, video)| PlaylistEntry {
                position,
                video: Video::from(video),
            })
            .collect())
    }
}
