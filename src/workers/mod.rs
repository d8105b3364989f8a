// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台周期任务：排期发布、观看历史保留清理和转码状态轮询
pub mod publish_scheduler_worker;
pub mod retention_worker;
pub mod transcode_poller;
