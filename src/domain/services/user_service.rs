// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::errors::{DomainError, DomainResult, RepositoryError};
use crate::domain::models::page::{Page, PageRequest};
use crate::domain::models::user::{CurrentUser, User, UserRole};
use crate::domain::repositories::user_repository::UserRepository;
use crate::domain::services::auth_service::hash_password;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 新建用户的输入
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: UserRole,
}

/// 用户更新内容，`None` 字段保持不变
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

fn user_not_found() -> DomainError {
    DomainError::not_found("ユーザーが見つかりません")
}

fn map_conflict(err: RepositoryError) -> DomainError {
    match err {
        RepositoryError::Conflict(_) => {
            DomainError::conflict("このユーザー名は既に使用されています")
        }
        other => other.into(),
    }
}

/// 用户管理服务
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list(&self, page: PageRequest) -> DomainResult<Page<User>> {
        let (items, total) = self.users.list(page).await?;
        Ok(Page::new(items, total, page))
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<User> {
        self.users.find_by_id(id).await?.ok_or_else(user_not_found)
    }

    /// 创建用户
    ///
    /// # 参数
    ///
    /// * `input` - 用户名、显示名、明文密码与角色
    ///
    /// # 返回值
    ///
    /// * `Ok(User)` - 新用户
    /// * `Err(DomainError::Conflict)` - 用户名已存在
    pub async fn create(&self, input: NewUser) -> DomainResult<User> {
        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(DomainError::validation("ユーザー名を入力してください"));
        }

        let now = Utc::now();
        let display_name = match input.display_name.trim() {
            "" => username.clone(),
            name => name.to_string(),
        };
        let user = User {
            id: Uuid::new_v4(),
            username,
            display_name,
            password_hash: hash_password(&input.password)?,
            role: input.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.users.create(&user).await.map_err(map_conflict)?;
        info!("User {} created with role {}", created.username, created.role);
        Ok(created)
    }

    /// 更新用户资料、角色、密码或启用状态
    pub async fn update(&self, id: Uuid, changes: UserChanges) -> DomainResult<User> {
        let mut user = self.get(id).await?;

        if let Some(display_name) = changes.display_name {
            let display_name = display_name.trim();
            if display_name.is_empty() {
                return Err(DomainError::validation("表示名を入力してください"));
            }
            user.display_name = display_name.to_string();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(password) = changes.password {
            user.password_hash = hash_password(&password)?;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }

        self.users.update(&user).await.map_err(|e| match e {
            RepositoryError::NotFound => user_not_found(),
            other => map_conflict(other),
        })
    }

    /// 删除用户，不能删除自己
    pub async fn delete(&self, actor: &CurrentUser, id: Uuid) -> DomainResult<()> {
        if actor.id == id {
            return Err(DomainError::validation("自分自身のアカウントは削除できません"));
        }
        if !self.users.delete(id).await? {
            return Err(user_not_found());
        }
        info!("User {} deleted by {}", id, actor.username);
        Ok(())
    }

    /// 用户表为空时创建初始管理员
    ///
    /// # 返回值
    ///
    /// 实际创建时返回新用户
    pub async fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.users.count().await? > 0 {
            return Ok(None);
        }
        let admin = self
            .create(NewUser {
                username: username.to_string(),
                display_name: username.to_string(),
                password: password.to_string(),
                role: UserRole::Admin,
            })
            .await?;
        Ok(Some(admin))
    }
}
