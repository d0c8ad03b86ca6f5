// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::services::user_service::UserService;
use crate::presentation::handlers::{app_handler, user_handler};
use crate::presentation::middleware::request_logger::request_logger;
use axum::{
    middleware,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;

/// 构建应用路由
pub fn routes(service: Arc<UserService>, settings: Arc<Settings>) -> Router {
    Router::new()
        .route("/", get(app_handler::index))
        .route("/health", get(app_handler::health))
        .route(
            "/users",
            get(user_handler::list_users).post(user_handler::create_user),
        )
        .route("/users/{id}", get(user_handler::get_user))
        .layer(middleware::from_fn(request_logger))
        .layer(Extension(service))
        .layer(Extension(settings))
}
