// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use validator::Validate;

use crate::domain::services::video_service::VideoInput;

#[derive(Debug, Deserialize, Validate)]
pub struct VideoRequestDto {
    #[validate(length(min = 1, max = 200, message = "タイトルは 1〜200 文字で入力してください"))]
    pub title: String,
    #[validate(length(min = 1, max = 1024, message = "ファイルパスを入力してください"))]
    pub file_path: String,
    #[validate(range(min = 0.0, message = "再生時間は 0 以上の数値で指定してください"))]
    pub duration_seconds: Option<f64>,
}

impl From<VideoRequestDto> for VideoInput {
    fn from(dto: VideoRequestDto) -> Self {
        Self {
            title: dto.title,
            file_path: dto.file_path,
            duration_seconds: dto.duration_seconds,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ThumbnailRequestDto {
    /// 截取位置（秒）
    pub timestamp: Option<f64>,
}
