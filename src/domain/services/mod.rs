// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了业务规则，
/// 协调多个仓库来完成业务操作。
///
/// 包含的服务：
/// - 观看统计（view_tracking_service）：会话去重、播放计数与观看历史
/// - 定时发布（publish_scheduler_service）：按时间公开和下线帖子
/// - 保留清理（retention_service）：分批删除过期的观看数据
/// - 认证（auth_service）与用户管理（user_service）
/// - 内容管理：分类标签、帖子、视频、播放列表
/// - 转码编排（transcode_service）与 GPU 转码客户端接口（transcoder）
/// - 统计（analytics_service）与系统设置（settings_service）
pub mod analytics_service;
pub mod auth_service;
pub mod playlist_service;
pub mod post_service;
pub mod publish_scheduler_service;
pub mod retention_service;
pub mod settings_service;
pub mod taxonomy_service;
pub mod transcode_service;
pub mod transcoder;
pub mod user_service;
pub mod video_service;
pub mod view_tracking_service;
