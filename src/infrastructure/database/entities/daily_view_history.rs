// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_view_histories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub view_date: Date,
    #[sea_orm(column_type = "Double")]
    pub watch_duration: f64,
    #[sea_orm(column_type = "Double")]
    pub completion_rate: f64,
    pub session_count: i32,
    pub first_watched_at: DateTimeWithTimeZone,
    pub last_watched_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
