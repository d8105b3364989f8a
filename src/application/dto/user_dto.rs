// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::user::{User, UserRole};
use crate::domain::services::user_service::{NewUser, UserChanges};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequestDto {
    #[validate(length(min = 3, max = 64, message = "ユーザー名は 3〜64 文字で入力してください"))]
    pub username: String,
    #[validate(length(max = 100, message = "表示名は 100 文字以内で入力してください"))]
    pub display_name: Option<String>,
    #[validate(length(min = 8, max = 128, message = "パスワードは 8〜128 文字で入力してください"))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

impl From<CreateUserRequestDto> for NewUser {
    fn from(dto: CreateUserRequestDto) -> Self {
        Self {
            username: dto.username,
            display_name: dto.display_name.unwrap_or_default(),
            password: dto.password,
            role: dto.role,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequestDto {
    #[validate(length(min = 1, max = 100, message = "表示名は 1〜100 文字で入力してください"))]
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    #[validate(length(min = 8, max = 128, message = "パスワードは 8〜128 文字で入力してください"))]
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequestDto> for UserChanges {
    fn from(dto: UpdateUserRequestDto) -> Self {
        Self {
            display_name: dto.display_name,
            role: dto.role,
            password: dto.password,
            is_active: dto.is_active,
        }
    }
}

/// 对外返回的用户信息，不含密码哈希
#[derive(Debug, Serialize)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
