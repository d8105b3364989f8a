// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use metrics::counter;
use serde_json::json;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::infrastructure::metrics::RATE_LIMITED_REQUESTS_TOTAL;
use crate::utils::net::client_ip;

/// 速率限制错误类型
#[derive(Error, Debug, PartialEq)]
pub enum RateLimitError {
    /// 请求过多，`retry_after` 秒后窗口内会腾出名额
    #[error("Too many requests, retry after {retry_after}s")]
    TooManyRequests { retry_after: u64 },
}

/// 按客户端IP的内存滑动窗口限流器
///
/// 只在单进程内生效，每个键保存窗口内的请求时间戳
#[derive(Clone, Debug)]
pub struct SlidingWindowRateLimiter {
    windows: Arc<DashMap<String, VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl SlidingWindowRateLimiter {
    /// 创建新的限流器
    ///
    /// # 参数
    ///
    /// * `max_requests` - 窗口内允许的最大请求数
    /// * `window` - 滑动窗口长度
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            max_requests: max_requests.max(1) as usize,
            window: window.max(Duration::from_secs(1)),
        }
    }

    /// 记录一次请求并判断是否超限
    pub fn check(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut entry = self.windows.entry(key.to_string()).or_default();
        let timestamps = entry.value_mut();

        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.max_requests {
            let retry_after = timestamps
                .front()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            // 向上取整到秒，至少 1 秒
            let retry_after = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            return Err(RateLimitError::TooManyRequests {
                retry_after: retry_after.max(1),
            });
        }

        timestamps.push_back(now);
        Ok(())
    }

    /// 删除窗口内已无请求的键
    ///
    /// # 返回值
    ///
    /// 被删除的键数
    pub fn purge_stale(&self) -> usize {
        self.purge_stale_at(Instant::now())
    }

    fn purge_stale_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, timestamps| {
            timestamps
                .back()
                .is_some_and(|newest| now.duration_since(*newest) < self.window)
        });
        before.saturating_sub(self.windows.len())
    }

    /// 启动按窗口周期清理过期键的后台任务
    pub fn spawn_cleanup(&self) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(limiter.window);
            loop {
                interval.tick().await;
                let purged = limiter.purge_stale();
                if purged > 0 {
                    debug!("Rate limiter purged {} stale clients", purged);
                }
            }
        })
    }
}

/// 速率限制中间件
///
/// 超限时返回 429 并附带 `Retry-After` 头
pub async fn rate_limit_middleware(
    State(limiter): State<SlidingWindowRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_ip(req.headers(), peer).unwrap_or_else(|| "unknown".to_string());

    match limiter.check(&key) {
        Ok(()) => next.run(req).await,
        Err(RateLimitError::TooManyRequests { retry_after }) => {
            counter!(RATE_LIMITED_REQUESTS_TOTAL).increment(1);
            warn!("Rate limit exceeded for client {}", key);

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "リクエストが多すぎます。しばらくしてから再度お試しください"
                })),
            )
                .into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}
