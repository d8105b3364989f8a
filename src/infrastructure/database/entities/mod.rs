// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 定义数据库表对应的实体结构
/// 使用SeaORM框架进行对象关系映射，枚举字段以字符串存储
pub mod category;
pub mod daily_view_history;
pub mod playlist;
pub mod playlist_video;
pub mod post;
pub mod post_tag;
pub mod system_setting;
pub mod tag;
pub mod transcode_job;
pub mod user;
pub mod video;
pub mod view_history;
pub mod view_log;
