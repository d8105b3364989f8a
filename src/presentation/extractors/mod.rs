// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求提取器
///
/// - 当前用户（auth_user）：必选与可选两种
/// - 客户端信息（client_info）：IP、User-Agent 与会话指纹
/// - 校验（validated）：带 validator 校验的 JSON 与查询参数
pub mod auth_user;
pub mod client_info;
pub mod validated;
