// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// - 网络（net）：客户端IP解析与IP允许列表
/// - 遥测（telemetry）：tracing 初始化
pub mod net;
pub mod telemetry;
