// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 唯一约束冲突
    #[error("Unique constraint violated: {0}")]
    Conflict(String),
}

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        if let DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) = err {
            return RepositoryError::NotFound;
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => RepositoryError::Conflict(detail),
            _ => RepositoryError::Database(err),
        }
    }
}

/// 领域错误类型
///
/// 业务规则失败时返回，消息直接面向最终用户
#[derive(Error, Debug)]
pub enum DomainError {
    /// 输入校验失败
    #[error("{0}")]
    Validation(String),
    /// 未认证或令牌无效
    #[error("{0}")]
    Unauthorized(String),
    /// 权限不足
    #[error("{0}")]
    Forbidden(String),
    /// 资源不存在
    #[error("{0}")]
    NotFound(String),
    /// 资源冲突
    #[error("{0}")]
    Conflict(String),
    /// 外部服务（GPU 转码）调用失败
    #[error("{0}")]
    Upstream(String),
    /// 不应暴露给调用方的内部错误
    #[error("Internal error: {0}")]
    Internal(String),
    /// 仓库错误
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }

    pub fn forbidden() -> Self {
        DomainError::Forbidden("この操作を行う権限がありません".to_string())
    }

    pub fn unauthorized() -> Self {
        DomainError::Unauthorized("認証が必要です".to_string())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }
}

/// 领域层统一结果类型
pub type DomainResult<T> = Result<T, DomainError>;
