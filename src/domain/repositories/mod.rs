// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层基于 SeaORM 提供。
///
/// 包含的仓库接口：
/// - 用户仓库（user_repository）
/// - 分类与标签仓库（taxonomy_repository）
/// - 帖子仓库（post_repository）：含定时发布的状态切换
/// - 视频仓库（video_repository）
/// - 播放列表仓库（playlist_repository）
/// - 观看数据仓库（view_repository）：会话日志、播放计数、观看历史与保留清理
/// - 系统设置仓库（setting_repository）
/// - 转码任务仓库（transcode_job_repository）
pub mod playlist_repository;
pub mod post_repository;
pub mod setting_repository;
pub mod taxonomy_repository;
pub mod transcode_job_repository;
pub mod user_repository;
pub mod video_repository;
pub mod view_repository;
