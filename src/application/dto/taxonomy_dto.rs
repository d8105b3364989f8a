// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

use crate::domain::services::taxonomy_service::CategoryInput;

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequestDto {
    #[validate(length(min = 1, max = 100, message = "カテゴリ名は 1〜100 文字で入力してください"))]
    pub name: String,
    #[validate(length(min = 1, max = 128, message = "スラッグは 1〜128 文字で入力してください"))]
    pub slug: String,
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<CategoryRequestDto> for CategoryInput {
    fn from(dto: CategoryRequestDto) -> Self {
        Self {
            name: dto.name,
            slug: dto.slug,
            description: dto.description,
            sort_order: dto.sort_order,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TagRequestDto {
    #[validate(length(min = 1, max = 50, message = "タグ名は 1〜50 文字で入力してください"))]
    pub name: String,
}
