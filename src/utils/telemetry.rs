// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::LogSettings;
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 保持非阻塞文件写入器存活；释放时刷新缓冲
pub struct TelemetryGuards {
    _info: WorkerGuard,
    _error: WorkerGuard,
}

/// 初始化日志：控制台输出加配置目录下按天滚动的JSON日志文件
/// （一份按配置级别记录全部，一份仅记录错误）
pub fn init_telemetry(settings: &LogSettings) -> Result<TelemetryGuards> {
    std::fs::create_dir_all(&settings.dir)?;

    let info_file = tracing_appender::rolling::daily(&settings.dir, "application.log");
    let (info_writer, info_guard) = tracing_appender::non_blocking(info_file);

    let error_file = tracing_appender::rolling::daily(&settings.dir, "error.log");
    let (error_writer, error_guard) = tracing_appender::non_blocking(error_file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.clone()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(info_writer),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(error_writer)
                .with_filter(LevelFilter::ERROR),
        )
        .init();

    Ok(TelemetryGuards {
        _info: info_guard,
        _error: error_guard,
    })
}
