// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::domain::errors::DomainError;
use crate::presentation::errors::AppError;

/// 定时任务触发接口的共享密钥
#[derive(Clone, Debug, Default)]
pub struct CronSecret(pub Option<Arc<str>>);

impl CronSecret {
    pub fn new(secret: Option<String>) -> Self {
        Self(
            secret
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(Arc::from),
        )
    }
}

/// 校验 `Authorization: Bearer <secret>`
///
/// 未配置密钥时所有请求都被拒绝
pub async fn cron_auth_middleware(
    State(secret): State<CronSecret>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match (secret.0.as_deref(), provided) {
        (Some(expected), Some(provided)) if constant_time_eq(expected, provided.trim()) => {
            Ok(next.run(req).await)
        }
        (None, _) => {
            warn!("Cron endpoint {} called but no cron secret is configured", req.uri().path());
            Err(DomainError::unauthorized().into())
        }
        _ => {
            warn!("Cron endpoint {} called with invalid secret", req.uri().path());
            Err(DomainError::unauthorized().into())
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
