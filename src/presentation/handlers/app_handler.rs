// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use axum::{Extension, Json};
use chrono::Utc;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{MemoryRefreshKind, RefreshKind, System};

static START: Lazy<Instant> = Lazy::new(Instant::now);

/// 固定运行时长的起点；启动时调用一次
pub fn init_uptime() {
    Lazy::force(&START);
}

/// 存活探测文本
pub async fn index(Extension(settings): Extension<Arc<Settings>>) -> String {
    format!("{} is running", settings.app.name)
}

/// 健康报告：状态、时间戳、运行时长和内存占用
pub async fn health() -> Json<Value> {
    let mut sys = System::new_with_specifics(
        RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
    );
    sys.refresh_memory();

    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": START.elapsed().as_secs(),
        "memory": {
            "used_bytes": sys.used_memory(),
            "total_bytes": sys.total_memory(),
        },
    }))
}
