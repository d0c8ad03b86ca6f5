// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::InfluxSettings;
use crate::domain::services::metrics_sink::{FieldValue, MetricPoint, MetricsSink};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

/// InfluxDB v2指标写入器
///
/// 将指标点编码为行协议并提交到v2写入API。写入失败返回给调用方，
/// 由其按尽力而为处理并仅记录日志。
pub struct InfluxMetricsSink {
    client: reqwest::Client,
    write_url: String,
    ping_url: String,
    token: String,
}

impl InfluxMetricsSink {
    pub fn new(settings: &InfluxSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        let base = settings.url.trim_end_matches('/');
        Self {
            client,
            write_url: format!(
                "{}/api/v2/write?org={}&bucket={}&precision=ns",
                base, settings.org, settings.bucket
            ),
            ping_url: format!("{}/ping", base),
            token: settings.token.clone(),
        }
    }

    /// 启动时对`/ping`端点的连通性探测
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.ping_url)
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(anyhow!("InfluxDB ping failed with status {}: {}", status, body))
        }
    }
}

#[async_trait]
impl MetricsSink for InfluxMetricsSink {
    async fn write_point(&self, point: MetricPoint) -> Result<()> {
        let line = encode_line(&point);

        let response = self
            .client
            .post(&self.write_url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(line)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(anyhow!(
                "InfluxDB write failed with status {}: {}",
                status,
                body
            ))
        }
    }
}

/// 将单个指标点编码为一条InfluxDB行协议记录
fn encode_line(point: &MetricPoint) -> String {
    let mut line = escape_measurement(&point.measurement);

    for (key, value) in &point.tags {
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }

    let fields: Vec<String> = point
        .fields
        .iter()
        .map(|(key, value)| format!("{}={}", escape_key(key), encode_field(value)))
        .collect();
    line.push(' ');
    line.push_str(&fields.join(","));

    line.push(' ');
    line.push_str(
        &point
            .timestamp
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_string(),
    );

    line
}

fn encode_field(value: &FieldValue) -> String {
    match value {
        FieldValue::Integer(n) => format!("{}i", n),
        FieldValue::Float(f) => f.to_string(),
        FieldValue::Text(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
    }
}

fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

fn escape_key(s: &str) -> String {
    s.replace(',', "\\,").replace('=', "\\=").replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_point() -> MetricPoint {
        let mut point = MetricPoint::new("user_operation")
            .tag("operation", "create")
            .tag("username", "bob")
            .field_i64("id", 42);
        point.timestamp = chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        point
    }

    #[test]
    fn test_encode_line_basic() {
        let line = encode_line(&fixed_point());
        assert_eq!(
            line,
            "user_operation,operation=create,username=bob id=42i 1700000000000000000"
        );
    }

    #[test]
    fn test_encode_line_escapes_tags_and_measurement() {
        let mut point = MetricPoint::new("user query")
            .tag("env", "eu west")
            .field_i64("count", 3);
        point.timestamp = chrono::Utc.timestamp_opt(0, 0).unwrap();

        let line = encode_line(&point);
        assert_eq!(line, "user\\ query,env=eu\\ west count=3i 0");
    }

    #[test]
    fn test_encode_field_variants() {
        assert_eq!(encode_field(&FieldValue::Integer(7)), "7i");
        assert_eq!(encode_field(&FieldValue::Float(2.5)), "2.5");
        assert_eq!(
            encode_field(&FieldValue::Text("say \"hi\"".to_string())),
            "\"say \\\"hi\\\"\""
        );
    }

    #[test]
    fn test_encode_line_multiple_fields() {
        let mut point = MetricPoint::new("m")
            .field_i64("a", 1)
            .field_text("b", "x");
        point.timestamp = chrono::Utc.timestamp_opt(1, 0).unwrap();

        let line = encode_line(&point);
        assert_eq!(line, "m a=1i,b=\"x\" 1000000000");
    }
}
