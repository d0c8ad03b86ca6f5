// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{error, info};

/// 包裹所有入站请求的请求/响应日志中间件
///
/// 分发前记录请求，完成后记录状态码和耗时；错误状态以error级别
/// 记录。从不读取或修改响应体。
pub async fn request_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    info!("request - {} {}", method, uri);
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis();
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        error!("error - {} {} - {}ms - {}", method, uri, elapsed_ms, status);
    } else {
        info!("response - {} {} - {}ms - {}", method, uri, elapsed_ms, status);
    }

    response
}
