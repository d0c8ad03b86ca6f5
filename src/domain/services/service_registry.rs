// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// 待注册到注册中心代理的逻辑服务实例
///
/// 序列化为代理的注册载荷（PascalCase键）。范围内没有注销路径；
/// 记录保留到运维手动清理。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Tags", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "Port", skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "Meta", skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, String>,
}

/// 尽力而为的服务注册。失败在编排层捕获并记录日志，从不向上
/// 传播。
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    async fn register(&self, record: &ServiceRecord) -> Result<()>;
}
