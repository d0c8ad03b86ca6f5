// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 缓存层错误类型
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Backend(String),
}

/// 键值缓存接口
///
/// 缓存条目仅作参考：键不存在只表示需要回源重取，从不代表数据
/// 不存在。后端故障在读路径按未命中处理、在写路径仅记录日志，
/// 由调用方决定
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;
    /// 返回删除的键数量
    async fn delete(&self, key: &str) -> Result<u64, CacheError>;
}
