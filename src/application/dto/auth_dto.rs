// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user_dto::UserResponseDto;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, max = 64, message = "ユーザー名を入力してください"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "パスワードを入力してください"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponseDto {
    pub token: String,
    pub user: UserResponseDto,
}
