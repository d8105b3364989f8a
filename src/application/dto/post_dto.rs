// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::errors::DomainError;
use crate::domain::models::page::PageRequest;
use crate::domain::models::post::{PostFilter, Visibility};
use crate::domain::services::post_service::PostInput;

/// 解析可见性字符串，缺省为 `default`
pub fn parse_visibility(value: Option<&str>, default: Visibility) -> Result<Visibility, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.to_ascii_uppercase().parse().map_err(|_| {
            DomainError::validation("公開設定は PUBLIC・PRIVATE・DRAFT のいずれかを指定してください")
        }),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PostRequestDto {
    #[validate(length(min = 1, max = 128, message = "スラッグは 1〜128 文字で入力してください"))]
    pub slug: String,
    #[validate(length(min = 1, max = 200, message = "タイトルは 1〜200 文字で入力してください"))]
    pub title: String,
    pub description: Option<String>,
    pub visibility: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    pub scheduled_publish_at: Option<DateTime<Utc>>,
    pub scheduled_unpublish_at: Option<DateTime<Utc>>,
}

impl TryFrom<PostRequestDto> for PostInput {
    type Error = DomainError;

    fn try_from(dto: PostRequestDto) -> Result<Self, Self::Error> {
        Ok(Self {
            visibility: parse_visibility(dto.visibility.as_deref(), Visibility::Draft)?,
            slug: dto.slug,
            title: dto.title,
            description: dto.description,
            category_id: dto.category_id,
            tag_ids: dto.tag_ids,
            scheduled_publish_at: dto.scheduled_publish_at,
            scheduled_unpublish_at: dto.scheduled_unpublish_at,
        })
    }
}

/// 帖子列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub category: Option<Uuid>,
    pub tag: Option<Uuid>,
    pub q: Option<String>,
    /// 仅内容管理员生效
    pub visibility: Option<String>,
}

impl PostListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }

    pub fn filter(&self) -> Result<PostFilter, DomainError> {
        let visibility = match self.visibility.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                Some(parse_visibility(Some(raw), Visibility::Public)?)
            }
            _ => None,
        };
        Ok(PostFilter {
            visibility,
            category_id: self.category,
            tag_id: self.tag,
            query: self.q.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_parsing() {
        assert_eq!(parse_visibility(None, Visibility::Draft).unwrap(), Visibility::Draft);
        assert_eq!(
            parse_visibility(Some("public"), Visibility::Draft).unwrap(),
            Visibility::Public
        );
        assert!(parse_visibility(Some("secret"), Visibility::Draft).is_err());
    }
}
