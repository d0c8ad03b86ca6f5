// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::event_publisher::EventPublisher;
use anyhow::Result;
use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// 与下游消费者共享的队列；必须保持持久化
const QUEUE_NAME: &str = "nest_micro_service_queue";

/// RabbitMQ事件发布器
///
/// 持有惰性建立的通道：启动时代理不可用仅记录日志并继续，中断
/// 后的首次成功发布会重新连接。连接与通道一同保存，避免通道使
/// 用期间连接被释放。
pub struct RabbitMqPublisher {
    /// AMQP连接URL
    url: String,
    link: Mutex<Option<(Connection, Channel)>>,
}

impl RabbitMqPublisher {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            link: Mutex::new(None),
        }
    }

    /// 启动时的连接尝试。失败后保持惰性状态；发布时会重试连接。
    pub async fn connect(&self) -> Result<()> {
        self.channel().await.map(|_| ())
    }

    async fn channel(&self) -> Result<Channel> {
        let mut link = self.link.lock().await;

        if let Some((_, channel)) = link.as_ref() {
            if channel.status().connected() {
                return Ok(channel.clone());
            }
            *link = None;
        }

        let connection = Connection::connect(&self.url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                QUEUE_NAME,
                QueueDeclareOptions {
                    durable: true,
                    ..QueueDeclareOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        let cloned = channel.clone();
        *link = Some((connection, channel));
        Ok(cloned)
    }
}

#[async_trait]
impl EventPublisher for RabbitMqPublisher {
    async fn emit(&self, topic: &str, payload: Value) -> Result<()> {
        let channel = self.channel().await?;

        // Consumers dispatch on the `pattern` field of the envelope.
        let envelope = json!({
            "pattern": topic,
            "data": payload,
        });
        let body = serde_json::to_vec(&envelope)?;

        // Awaiting the publish only hands the frame to the broker; no
        // delivery confirmation is requested.
        let _confirm = channel
            .basic_publish(
                "",
                QUEUE_NAME,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default().with_delivery_mode(2),
            )
            .await?;

        Ok(())
    }
}
