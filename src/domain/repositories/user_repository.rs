// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::{CreateUser, User};
use async_trait::async_trait;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),
}

/// 用户仓储接口
///
/// users表的数据访问接口。仅支持查询和插入；本服务从不更新或
/// 删除用户
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 查询全部用户，按id升序
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
    /// 按主键查询单个用户；记录不存在时返回`None`
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError>;
    /// 插入草稿并返回带生成id的完整记录
    async fn insert(&self, draft: CreateUser) -> Result<User, RepositoryError>;
}
