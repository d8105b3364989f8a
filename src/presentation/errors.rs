// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domain::errors::{DomainError, RepositoryError};

const INTERNAL_ERROR_MESSAGE: &str = "サーバー内部でエラーが発生しました";

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按领域错误类型映射为 HTTP 状态码。
/// 内部错误只写日志，响应中使用统一的提示。
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        if let Some(err) = self.0.downcast_ref::<DomainError>() {
            return match err {
                DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                DomainError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                DomainError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
                DomainError::Repository(RepositoryError::NotFound) => (
                    StatusCode::NOT_FOUND,
                    "リソースが見つかりません".to_string(),
                ),
                DomainError::Repository(RepositoryError::Conflict(_)) => (
                    StatusCode::CONFLICT,
                    "リソースが既に存在します".to_string(),
                ),
                DomainError::Repository(RepositoryError::Database(_))
                | DomainError::Internal(_) => internal(),
            };
        }

        match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound) => (
                StatusCode::NOT_FOUND,
                "リソースが見つかりません".to_string(),
            ),
            Some(RepositoryError::Conflict(_)) => (
                StatusCode::CONFLICT,
                "リソースが既に存在します".to_string(),
            ),
            _ => internal(),
        }
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        }

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
