// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// vidshare 数据库迁移命令行入口
///
/// 通过 `DATABASE_URL` 环境变量选择目标数据库
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
