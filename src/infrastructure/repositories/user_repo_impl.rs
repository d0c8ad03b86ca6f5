// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set};
use std::sync::Arc;

use crate::domain::models::user::{CreateUser, User};
use crate::domain::repositories::user_repository::{RepositoryError, UserRepository};
use crate::infrastructure::database::entities::user;

/// 用户仓储的sea-orm实现
pub struct UserRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password: model.password,
            email: model.email,
            is_active: model.is_active,
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        let user = user::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(user.map(User::from))
    }

    async fn insert(&self, draft: CreateUser) -> Result<User, RepositoryError> {
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(draft.username),
            password: Set(draft.password),
            email: Set(draft.email),
            is_active: Set(draft.is_active),
        };

        let inserted = model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(inserted.into())
    }
}
