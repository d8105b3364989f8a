// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::AuthSettings;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::user::{CurrentUser, User, UserRole};
use crate::domain::repositories::user_repository::UserRepository;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// JWT 声明
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// 用户ID
    pub sub: Uuid,
    pub username: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// 使用 Argon2 生成 PHC 格式的密码哈希
pub fn hash_password(password: &str) -> DomainResult<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| DomainError::Internal(format!("salt generation failed: {}", e)))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::Internal(format!("password hashing failed: {}", e)))
}

/// 校验密码，哈希格式损坏时视为不匹配
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

fn invalid_credentials() -> DomainError {
    DomainError::Unauthorized("ユーザー名またはパスワードが正しくありません".to_string())
}

/// 认证服务
///
/// 负责登录、签发 HS256 令牌以及把令牌解析为当前用户
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, settings: &AuthSettings) -> Self {
        let secret = settings.jwt_secret.as_bytes();
        Self {
            users,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_ttl: Duration::hours(settings.token_ttl_hours.max(1)),
        }
    }

    /// 为用户签发令牌
    pub fn issue_token(&self, user: &User) -> DomainResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::Internal(format!("token encoding failed: {}", e)))
    }

    /// 校验签名和过期时间
    pub fn decode_token(&self, token: &str) -> DomainResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected token: {}", e);
                DomainError::Unauthorized("認証トークンが無効です".to_string())
            })
    }

    /// 用户名密码登录
    ///
    /// # 参数
    ///
    /// * `username` - 登录名
    /// * `password` - 明文密码
    ///
    /// # 返回值
    ///
    /// * `Ok((String, User))` - 令牌与用户
    /// * `Err(DomainError::Unauthorized)` - 凭据错误或用户已停用
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<(String, User)> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(invalid_credentials());
        }
        if !user.is_active {
            return Err(DomainError::Unauthorized(
                "このアカウントは無効化されています".to_string(),
            ));
        }

        let token = self.issue_token(&user)?;
        debug!("User {} logged in", user.username);
        Ok((token, user))
    }

    /// 把令牌解析为当前用户
    ///
    /// 角色以数据库为准，已停用或已删除的用户会被拒绝
    pub async fn authenticate(&self, token: &str) -> DomainResult<CurrentUser> {
        let claims = self.decode_token(token)?;
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| DomainError::Unauthorized("認証トークンが無効です".to_string()))?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }

    /// 按用户ID读取完整资料
    pub async fn profile(&self, current: &CurrentUser) -> DomainResult<User> {
        self.users
            .find_by_id(current.id)
            .await?
            .ok_or_else(DomainError::unauthorized)
    }
}
