// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::services::auth_service::AuthService;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
    /// 存放令牌的 Cookie 名
    pub cookie_name: String,
}

/// 认证中间件
///
/// 从 `Authorization: Bearer` 头或认证 Cookie 中读取令牌，
/// 有效时把当前用户写入请求扩展。本中间件从不拒绝请求，
/// 是否必须登录由各处理器的提取器决定
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(req.headers(), &state.cookie_name) {
        match state.auth.authenticate(&token).await {
            Ok(user) => {
                debug!("Authenticated user {} ({})", user.username, user.role);
                req.extensions_mut().insert(user);
            }
            Err(e) => debug!("Ignoring invalid auth token on {}: {}", req.uri().path(), e),
        }
    }

    next.run(req).await
}

/// 读取令牌，Bearer 头优先于 Cookie
pub(crate) fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod auth_middleware_test;
