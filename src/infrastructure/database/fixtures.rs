// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 单元测试共用的数据库夹具

use crate::domain::models::post::Visibility;
use crate::domain::models::user::UserRole;
use crate::infrastructure::database::entities::{post, user, video};
use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::sync::Arc;
use uuid::Uuid;

pub async fn setup_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

pub async fn create_user(db: &DatabaseConnection, username: &str, role: UserRole) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now().fixed_offset();
    user::ActiveModel {
        id: Set(id),
        username: Set(username.to_string()),
        display_name: Set(username.to_string()),
        password_hash: Set("unused".to_string()),
        role: Set(role.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn create_post(
    db: &DatabaseConnection,
    creator_id: Uuid,
    slug: &str,
    visibility: Visibility,
    scheduled_publish_at: Option<DateTime<Utc>>,
    scheduled_unpublish_at: Option<DateTime<Utc>>,
) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now().fixed_offset();
    post::ActiveModel {
        id: Set(id),
        slug: Set(slug.to_string()),
        title: Set(slug.to_string()),
        description: Set(None),
        visibility: Set(visibility.to_string()),
        category_id: Set(None),
        creator_id: Set(creator_id),
        scheduled_publish_at: Set(scheduled_publish_at.map(|t| t.fixed_offset())),
        scheduled_unpublish_at: Set(scheduled_unpublish_at.map(|t| t.fixed_offset())),
        published_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub async fn create_video(db: &DatabaseConnection, post_id: Uuid, title: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now().fixed_offset();
    video::ActiveModel {
        id: Set(id),
        post_id: Set(post_id),
        title: Set(title.to_string()),
        file_path: Set(format!("/srv/videos/{}.mp4", id)),
        duration_seconds: Set(Some(1800.0)),
        thumbnail_path: Set(None),
        view_count: Set(0),
        transcode_status: Set("PENDING".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
    id
}
