// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ConsulSettings;
use crate::domain::services::service_registry::{ServiceRecord, ServiceRegistry};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Consul服务注册中心
///
/// 通过本地代理的HTTP API注册服务记录。仅注册；范围内没有注销
/// 路径。
pub struct ConsulRegistry {
    client: reqwest::Client,
    register_url: String,
}

impl ConsulRegistry {
    pub fn new(settings: &ConsulSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            register_url: format!("{}/v1/agent/service/register", settings.base_url()),
        }
    }
}

#[async_trait]
impl ServiceRegistry for ConsulRegistry {
    async fn register(&self, record: &ServiceRecord) -> Result<()> {
        let response = self
            .client
            .put(&self.register_url)
            .json(record)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(anyhow!(
                "Consul registration failed with status {}: {}",
                status,
                body
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_service_record_registration_payload() {
        let record = ServiceRecord {
            name: "user-42".to_string(),
            id: "user-42".to_string(),
            tags: vec!["user".to_string(), "api".to_string()],
            address: Some("localhost".to_string()),
            port: Some(3000),
            meta: HashMap::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Name": "user-42",
                "ID": "user-42",
                "Tags": ["user", "api"],
                "Address": "localhost",
                "Port": 3000,
            })
        );
    }

    #[test]
    fn test_service_record_omits_empty_optionals() {
        let record = ServiceRecord {
            name: "svc".to_string(),
            id: "svc-1".to_string(),
            tags: Vec::new(),
            address: None,
            port: None,
            meta: HashMap::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"Name": "svc", "ID": "svc-1"}));
    }
}
