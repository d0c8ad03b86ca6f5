// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use demu_cloud::config::settings::Settings;
use demu_cloud::domain::services::user_service::UserService;
use demu_cloud::infrastructure::cache::redis_client::RedisClient;
use demu_cloud::infrastructure::database::connection;
use demu_cloud::infrastructure::messaging::rabbitmq_publisher::RabbitMqPublisher;
use demu_cloud::infrastructure::observability::influx_metrics::InfluxMetricsSink;
use demu_cloud::infrastructure::registry::consul_registry::ConsulRegistry;
use demu_cloud::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use demu_cloud::presentation::handlers::app_handler;
use demu_cloud::presentation::routes;
use demu_cloud::utils::telemetry;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration; a missing required variable aborts here
    let settings = Arc::new(Settings::from_env()?);

    // 2. Initialize logging (creates the log directory)
    let _telemetry_guards = telemetry::init_telemetry(&settings.log)?;
    app_handler::init_uptime();
    info!("Starting {}...", settings.app.name);

    // 3. Connect to the database; the source of truth is required
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Cache client; connectivity is probed but not required at boot
    let redis_client = RedisClient::new(&settings.redis.url())?;
    match redis_client.ping().await {
        Ok(()) => info!("Redis connection established"),
        Err(e) => warn!("Redis connection check failed: {}", e),
    }

    // 5. Metrics sink
    let influx = InfluxMetricsSink::new(&settings.influxdb);
    match influx.ping().await {
        Ok(()) => info!("InfluxDB connection established"),
        Err(e) => warn!("InfluxDB connection check failed: {}", e),
    }

    // 6. Event publisher; reconnects on demand after a boot failure
    let rabbitmq = RabbitMqPublisher::new(&settings.rabbitmq.url);
    match rabbitmq.connect().await {
        Ok(()) => info!("RabbitMQ channel ready"),
        Err(e) => warn!(
            "RabbitMQ connection failed, will retry on first publish: {}",
            e
        ),
    }

    // 7. Service registry
    let consul = ConsulRegistry::new(&settings.consul);

    // 8. Assemble the orchestrator
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let user_service = Arc::new(UserService::new(
        user_repo,
        Arc::new(redis_client),
        Arc::new(influx),
        Arc::new(rabbitmq),
        Arc::new(consul),
        "localhost".to_string(),
        settings.app.port,
    ));

    // 9. Start the HTTP server
    let app = routes::routes(user_service, settings.clone());
    let addr = format!("0.0.0.0:{}", settings.app.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
