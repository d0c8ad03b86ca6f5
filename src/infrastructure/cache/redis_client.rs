// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::cache_store::{CacheError, CacheStore};
use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Redis客户端
///
/// 多路复用异步连接的轻量封装，实现编排服务使用的缓存契约
#[derive(Clone)]
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// 仅校验连接URL；连接在每次操作时惰性建立
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    ///
    /// # 返回值
    ///
    /// * `Ok(RedisClient)` - Redis客户端实例
    /// * `Err(anyhow::Error)` - URL无效
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    /// 启动时的连通性探测。调用方记录结果后继续启动。
    pub async fn ping(&self) -> Result<()> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut con).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut con = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        let value: Option<String> = con
            .get(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut con = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        con.set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<u64, CacheError> {
        let mut con = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        let removed: u64 = con
            .del(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(removed)
    }
}
