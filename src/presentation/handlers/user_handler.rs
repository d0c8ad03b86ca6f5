// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::{CreateUser, User};
use crate::domain::services::user_service::UserService;
use crate::presentation::errors::AppError;
use axum::extract::Path;
use axum::{http::StatusCode, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// 创建用户的请求体。进入服务前显式校验；校验失败不会触达任何
/// 后端。
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(email, length(min = 5, max = 100))]
    pub email: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            email: request.email,
            is_active: request.is_active,
        }
    }
}

pub async fn list_users(
    Extension(service): Extension<Arc<UserService>>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = service.find_all().await?;
    Ok(Json(users))
}

/// 真实未命中返回状态200的JSON `null`，而非错误
pub async fn get_user(
    Extension(service): Extension<Arc<UserService>>,
    Path(id): Path<i32>,
) -> Result<Json<Option<User>>, AppError> {
    let user = service.find_one(id).await?;
    Ok(Json(user))
}

pub async fn create_user(
    Extension(service): Extension<Arc<UserService>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate()?;
    let user = service.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
