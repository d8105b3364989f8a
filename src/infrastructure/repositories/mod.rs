// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的具体实现
/// 包括各种实体仓库的数据库实现
pub mod playlist_repo_impl;
pub mod post_repo_impl;
pub mod setting_repo_impl;
pub mod taxonomy_repo_impl;
pub mod transcode_job_repo_impl;
pub mod user_repo_impl;
pub mod video_repo_impl;
pub mod view_repo_impl;
