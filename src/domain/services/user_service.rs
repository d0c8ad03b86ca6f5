// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::user::{CreateUser, User};
use crate::domain::repositories::cache_store::CacheStore;
use crate::domain::repositories::user_repository::{RepositoryError, UserRepository};
use crate::domain::services::event_publisher::EventPublisher;
use crate::domain::services::metrics_sink::{MetricPoint, MetricsSink};
use crate::domain::services::service_registry::{ServiceRecord, ServiceRegistry};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 保存完整用户集合快照的缓存键
pub const ALL_USERS_CACHE_KEY: &str = "all_users";

/// 本服务写入的所有缓存条目的固定过期时间
pub const USER_CACHE_TTL_SECONDS: u64 = 3600;

fn user_cache_key(id: i32) -> String {
    format!("user:{}", id)
}

/// 用户编排服务
///
/// 读路径为cache-aside：先查缓存并信任其新鲜度；仅在未命中
/// （或缓存故障，按未命中处理）时访问数据库，结果尽力回写。
///
/// 创建为写穿透加失效：数据库插入是唯一可失败的步骤，之后删除
/// 列表缓存，指标、事件和注册各自独立扇出。任一扇出步骤失败仅
/// 记录日志，不回滚插入、不中断后续步骤、不上抛给调用方。
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheStore>,
    metrics: Arc<dyn MetricsSink>,
    events: Arc<dyn EventPublisher>,
    registry: Arc<dyn ServiceRegistry>,
    /// 注册记录中对外通告的地址/端口
    advertise_address: String,
    advertise_port: u16,
}

impl UserService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repo: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheStore>,
        metrics: Arc<dyn MetricsSink>,
        events: Arc<dyn EventPublisher>,
        registry: Arc<dyn ServiceRegistry>,
        advertise_address: String,
        advertise_port: u16,
    ) -> Self {
        Self {
            repo,
            cache,
            metrics,
            events,
            registry,
            advertise_address,
            advertise_port,
        }
    }

    /// 查询全部用户，存在`all_users`缓存条目时直接返回
    ///
    /// 数据库读取后依次回写快照缓存、写入`user_query`指标点并
    /// 发出`user_query`事件；三者任何失败都不会使读取失败。
    pub async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        debug!("listing users");

        if let Some(users) = self.cached_value::<Vec<User>>(ALL_USERS_CACHE_KEY).await {
            debug!("served user list from cache");
            return Ok(users);
        }

        debug!("user list cache miss, reading from database");
        let users = self.repo.find_all().await?;

        self.cache_value(ALL_USERS_CACHE_KEY, &users).await;
        info!("user list cache refreshed with {} records", users.len());

        let point = MetricPoint::new("user_query")
            .tag("operation", "findAll")
            .field_i64("count", users.len() as i64);
        if let Err(e) = self.metrics.write_point(point).await {
            warn!("metric write for user_query failed: {}", e);
        }

        let payload = json!({
            "operation": "findAll",
            "timestamp": Utc::now(),
            "count": users.len(),
        });
        if let Err(e) = self.events.emit("user_query", payload).await {
            warn!("event emit for user_query failed: {}", e);
        }

        Ok(users)
    }

    /// 按id查询单个用户，存在`user:<id>`缓存条目时直接返回。
    /// 真实未命中返回`Ok(None)`而非错误，且不缓存缺失。
    pub async fn find_one(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        debug!("looking up user {}", id);

        let key = user_cache_key(id);
        if let Some(user) = self.cached_value::<User>(&key).await {
            debug!("served user {} from cache", id);
            return Ok(Some(user));
        }

        debug!("cache miss for user {}, reading from database", id);
        let user = self.repo.find_by_id(id).await?;

        match &user {
            Some(user) => self.cache_value(&key, user).await,
            None => warn!("user {} not found", id),
        }

        Ok(user)
    }

    /// 创建用户
    ///
    /// 插入是唯一可能使调用失败的步骤。随后删除列表缓存（单条
    /// `user:<id>`条目保持不动）、写入`user_operation`指标、发出
    /// `user_created`事件并将新用户注册为服务实例。四个步骤彼此
    /// 独立，互不影响执行。
    pub async fn create(&self, draft: CreateUser) -> Result<User, RepositoryError> {
        info!("creating user {}", draft.username);

        let user = self.repo.insert(draft).await?;
        info!("created user id {}", user.id);

        match self.cache.delete(ALL_USERS_CACHE_KEY).await {
            Ok(_) => debug!("user list cache invalidated"),
            Err(e) => warn!("failed to invalidate user list cache: {}", e),
        }

        let point = MetricPoint::new("user_operation")
            .tag("operation", "create")
            .tag("username", &user.username)
            .field_i64("id", i64::from(user.id));
        if let Err(e) = self.metrics.write_point(point).await {
            warn!("metric write for user_operation failed: {}", e);
        }

        let payload = json!({
            "id": user.id,
            "username": user.username,
            "timestamp": Utc::now(),
        });
        if let Err(e) = self.events.emit("user_created", payload).await {
            warn!("event emit for user_created failed: {}", e);
        }

        let record = ServiceRecord {
            name: format!("user-{}", user.id),
            id: format!("user-{}", user.id),
            tags: vec!["user".to_string(), "api".to_string()],
            address: Some(self.advertise_address.clone()),
            port: Some(self.advertise_port),
            meta: HashMap::new(),
        };
        match self.registry.register(&record).await {
            Ok(()) => info!("registered service record {}", record.id),
            Err(e) => error!("service registration for {} failed: {}", record.id, e),
        }

        Ok(user)
    }

    /// 永不失败的缓存读取：后端错误和无法解码的条目记录日志后
    /// 按未命中处理。
    async fn cached_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("discarding undecodable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("cache read for {} failed, falling back to database: {}", key, e);
                None
            }
        }
    }

    /// 按固定TTL尽力回写缓存
    async fn cache_value<T: serde::Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => {
                if let Err(e) = self
                    .cache
                    .set_ex(key, &json, USER_CACHE_TTL_SECONDS)
                    .await
                {
                    warn!("cache write for {} failed: {}", key, e);
                }
            }
            Err(e) => warn!("failed to serialize cache entry {}: {}", key, e),
        }
    }
}
