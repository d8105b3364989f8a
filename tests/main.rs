// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 测试主模块
///
/// 通过完整路由栈对 HTTP 接口做集成测试
mod integration;
