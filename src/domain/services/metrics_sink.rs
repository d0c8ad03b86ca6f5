// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 指标点上的单个字段值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// 时序存储的一次观测：测量名、标签、字段和时间戳。对本服务而言
/// 只写不读；任何地方都不会读回指标。
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub measurement: String,
    pub tags: Vec<(String, String)>,
    pub fields: Vec<(String, FieldValue)>,
    pub timestamp: DateTime<Utc>,
}

impl MetricPoint {
    pub fn new(measurement: &str) -> Self {
        Self {
            measurement: measurement.to_string(),
            tags: Vec::new(),
            fields: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push((key.to_string(), value.to_string()));
        self
    }

    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.push((key.to_string(), FieldValue::Integer(value)));
        self
    }

    pub fn field_f64(mut self, key: &str, value: f64) -> Self {
        self.fields.push((key.to_string(), FieldValue::Float(value)));
        self
    }

    pub fn field_text(mut self, key: &str, value: &str) -> Self {
        self.fields
            .push((key.to_string(), FieldValue::Text(value.to_string())));
        self
    }
}

/// 即发即弃的指标点写入接口。失败由调用方记录日志，从不影响
/// 请求处理。
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn write_point(&self, point: MetricPoint) -> Result<()>;
}
