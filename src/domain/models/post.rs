// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::UserRole;

/// 帖子实体
///
/// 帖子是发布单位，一个帖子下挂载一个或多个视频，
/// 其可见性可由定时字段自动切换。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// URL 中使用的唯一标识
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub category_id: Option<Uuid>,
    pub creator_id: Uuid,
    /// 到达该时间后自动公开
    pub scheduled_publish_at: Option<DateTime<Utc>>,
    /// 到达该时间后自动转为私有
    pub scheduled_unpublish_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    /// 所有人可见
    Public,
    /// 仅内容管理员可见
    Private,
    /// 草稿
    #[default]
    Draft,
}

impl Visibility {
    /// 给定角色（匿名为 `None`）是否可以看到该可见性的内容
    pub fn visible_to(self, role: Option<UserRole>) -> bool {
        self == Visibility::Public || role.is_some_and(UserRole::can_manage_content)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "PUBLIC"),
            Visibility::Private => write!(f, "PRIVATE"),
            Visibility::Draft => write!(f, "DRAFT"),
        }
    }
}

impl FromStr for Visibility {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Visibility::Public),
            "PRIVATE" => Ok(Visibility::Private),
            "DRAFT" => Ok(Visibility::Draft),
            _ => Err(()),
        }
    }
}

/// 帖子列表过滤条件
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    /// 限定可见性，`None` 表示不过滤
    pub visibility: Option<Visibility>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    /// 标题关键字
    pub query: Option<String>,
}
