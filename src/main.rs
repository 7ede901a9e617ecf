// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rankscope::application::AppContext;
use rankscope::config::settings::Settings;
use rankscope::infrastructure::database::connection;
use rankscope::infrastructure::metrics::init_metrics;
use rankscope::presentation::middleware::rate_limit_middleware::RateLimiters;
use rankscope::presentation::routes;
use rankscope::utils::telemetry;
use rankscope::workers::RankRefreshWorker;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use migration::{Migrator, MigratorTrait};

const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Arc::new(Settings::new()?);

    // 2. Initialize logging
    telemetry::init_telemetry(settings.log.json);
    info!("Starting rankscope ({})...", settings.environment);

    // Initialize Prometheus Metrics
    init_metrics(&settings.metrics);

    if settings.is_production() && settings.security.secret_key.starts_with("dev-") {
        warn!("Running in production with the development secret key");
    }

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize Components
    let ctx = Arc::new(AppContext::build(settings.clone(), db)?);
    let limiters = Arc::new(RateLimiters::from_settings(&settings.rate_limiting));
    info!("Components initialized");

    // 5. Start Workers
    if settings.workers.rank_refresh_enabled {
        RankRefreshWorker::new(
            ctx.rank_tracker.clone(),
            ctx.accounts.clone(),
            Duration::from_secs(settings.workers.rank_refresh_interval_secs),
        )
        .start();
    }

    let sweeper = limiters.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper.retain_recent();
        }
    });

    // 6. Start HTTP server
    let app = routes::routes(ctx, limiters);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
