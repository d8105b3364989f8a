// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

use crate::domain::errors::DomainError;
use crate::domain::models::user::{CurrentUser, UserRole};
use crate::presentation::errors::AppError;

/// 必须登录的请求者
///
/// 由认证中间件写入请求扩展，缺失时返回 401
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl AuthUser {
    /// 角色不足时返回 403
    pub fn require(&self, role: UserRole) -> Result<&CurrentUser, AppError> {
        self.0.require(role)?;
        Ok(&self.0)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| DomainError::unauthorized().into())
    }
}

/// 可选登录的请求者，无效令牌视为匿名
#[derive(Debug, Clone, Default)]
pub struct MaybeAuthUser(pub Option<CurrentUser>);

impl MaybeAuthUser {
    pub fn role(&self) -> Option<UserRole> {
        self.0.as_ref().map(|user| user.role)
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(parts.extensions.get::<CurrentUser>().cloned()))
    }
}
