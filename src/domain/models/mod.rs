// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 用户与角色（user）
/// - 帖子与可见性（post）、视频（video）、播放列表（playlist）
/// - 分类与标签（taxonomy）
/// - 观看日志、终身与按日观看历史（view）
/// - 系统设置（setting）、转码任务（transcode_job）
/// - 统计结果（analytics）与分页（page）
pub mod analytics;
pub mod page;
pub mod playlist;
pub mod post;
pub mod setting;
pub mod taxonomy;
pub mod transcode_job;
pub mod user;
pub mod video;
pub mod view;
