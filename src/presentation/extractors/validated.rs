// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::domain::errors::DomainError;
use crate::presentation::errors::AppError;

/// 反序列化后立即执行 validator 校验的 JSON 请求体
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

/// 取第一条校验错误消息，按字段名排序保证结果稳定
fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|err| err.message.as_ref().map(|msg| msg.to_string()))
        .unwrap_or_else(|| "入力内容が正しくありません".to_string())
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            debug!("Rejected JSON body: {}", rejection.body_text());
            DomainError::validation("リクエストの形式が正しくありません")
        })?;
        value
            .validate()
            .map_err(|errors| DomainError::validation(first_message(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

/// 查询字符串，解析失败时返回 JSON 格式的 400
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("Rejected query string: {}", rejection.body_text());
                DomainError::validation("クエリパラメータが正しくありません")
            })?;
        Ok(ApiQuery(value))
    }
}
