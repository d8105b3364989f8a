// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// 登录名，全局唯一
    pub username: String,
    pub display_name: String,
    /// Argon2 PHC 格式的密码哈希
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// 停用的用户无法登录，已签发的令牌也会被拒绝
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 已认证的请求者
///
/// 由令牌声明和数据库中的用户状态组合而成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// 角色不足时返回 `Forbidden`
    pub fn require(&self, role: UserRole) -> Result<(), DomainError> {
        if self.role.satisfies(role) {
            Ok(())
        } else {
            Err(DomainError::forbidden())
        }
    }
}

/// 用户角色
///
/// 权限按 ADMIN ⊇ CURATOR ⊇ VIEWER 逐级包含
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// 管理员：用户、系统设置、统计与清理
    Admin,
    /// 内容管理员：帖子、视频、分类、标签
    Curator,
    /// 普通观众
    #[default]
    Viewer,
}

impl UserRole {
    fn rank(self) -> u8 {
        match self {
            UserRole::Admin => 2,
            UserRole::Curator => 1,
            UserRole::Viewer => 0,
        }
    }

    /// 当前角色是否至少具备 `required` 角色的权限
    pub fn satisfies(self, required: UserRole) -> bool {
        self.rank() >= required.rank()
    }

    pub fn can_manage_content(self) -> bool {
        self.satisfies(UserRole::Curator)
    }

    pub fn is_admin(self) -> bool {
        self == UserRole::Admin
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Curator => write!(f, "CURATOR"),
            UserRole::Viewer => write!(f, "VIEWER"),
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "CURATOR" => Ok(UserRole::Curator),
            "VIEWER" => Ok(UserRole::Viewer),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Admin.satisfies(UserRole::Curator));
        assert!(UserRole::Admin.satisfies(UserRole::Viewer));
        assert!(UserRole::Curator.satisfies(UserRole::Curator));
        assert!(!UserRole::Curator.satisfies(UserRole::Admin));
        assert!(!UserRole::Viewer.can_manage_content());
        assert!(UserRole::Curator.can_manage_content());
        assert!(!UserRole::Curator.is_admin());
    }

    #[test]
    fn test_role_string_round_trip() {
        for role in [UserRole::Admin, UserRole::Curator, UserRole::Viewer] {
            assert_eq!(role.to_string().parse::<UserRole>(), Ok(role));
        }
        assert!("admin".parse::<UserRole>().is_err());
    }
}
