// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::post_dto::parse_visibility;
use crate::domain::errors::DomainError;
use crate::domain::models::post::Visibility;
use crate::domain::services::playlist_service::PlaylistInput;

#[derive(Debug, Deserialize, Validate)]
pub struct PlaylistRequestDto {
    #[validate(length(min = 1, max = 200, message = "タイトルは 1〜200 文字で入力してください"))]
    pub title: String,
    pub description: Option<String>,
    /// 缺省为私有
    pub visibility: Option<String>,
}

impl TryFrom<PlaylistRequestDto> for PlaylistInput {
    type Error = DomainError;

    fn try_from(dto: PlaylistRequestDto) -> Result<Self, Self::Error> {
        Ok(Self {
            visibility: parse_visibility(dto.visibility.as_deref(), Visibility::Private)?,
            title: dto.title,
            description: dto.description,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddPlaylistVideoRequestDto {
    pub video_id: Uuid,
    #[validate(range(min = 0, message = "位置は 0 以上の整数で指定してください"))]
    pub position: Option<i32>,
}
