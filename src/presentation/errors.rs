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

/// 应用错误类型
///
/// 封装处理器抛出的所有错误并映射为HTTP响应。校验失败携带字段
/// 明细；其余一律返回带错误消息的500。
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(validation) = self.0.downcast_ref::<validator::ValidationErrors>() {
            let body = Json(json!({
                "error": "validation failed",
                "details": validation,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        // Everything else on the critical path is a database failure.
        let body = Json(json!({ "error": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
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
