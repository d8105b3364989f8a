// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub title: String,
    pub file_path: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub duration_seconds: Option<f64>,
    pub thumbnail_path: Option<String>,
    pub view_count: i64,
    pub transcode_status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(has_many = "super::playlist_video::Entity")]
    PlaylistVideos,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::playlist_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlaylistVideos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
