// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::warn;

use crate::domain::errors::DomainError;
use crate::presentation::errors::AppError;
use crate::utils::net::{client_ip, is_ip_allowed};

/// 管理接口的IP白名单
///
/// 列表为空时不做限制，条目可以是单个IP或CIDR
#[derive(Clone, Debug, Default)]
pub struct AdminAllowlist(pub Arc<Vec<String>>);

impl AdminAllowlist {
    pub fn new(entries: Vec<String>) -> Self {
        Self(Arc::new(entries))
    }
}

/// 管理接口IP限制中间件，白名单外的请求返回 403
pub async fn admin_ip_middleware(
    State(allowlist): State<AdminAllowlist>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ip = client_ip(req.headers(), peer);

    if !is_ip_allowed(ip.as_deref(), &allowlist.0) {
        warn!(
            "Rejected admin request to {} from {}",
            req.uri().path(),
            ip.as_deref().unwrap_or("unknown")
        );
        return Err(DomainError::Forbidden(
            "この IP アドレスからは管理機能にアクセスできません".to_string(),
        )
        .into());
    }

    Ok(next.run(req).await)
}
