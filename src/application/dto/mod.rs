// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 HTTP 请求与响应的数据结构，请求体字段由 validator 校验，
/// 并转换为领域服务的输入
pub mod admin_dto;
pub mod auth_dto;
pub mod pagination;
pub mod playlist_dto;
pub mod post_dto;
pub mod taxonomy_dto;
pub mod user_dto;
pub mod video_dto;
pub mod view_dto;
