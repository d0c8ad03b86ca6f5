// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// 面向代理队列的即发即弃消息发布接口。调用方不要求投递确认。
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn emit(&self, topic: &str, payload: Value) -> Result<()>;
}
