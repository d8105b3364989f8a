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

use migration::{Migrator, MigratorTrait};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use vidshare::config::settings::Settings;
use vidshare::infrastructure::database::connection;
use vidshare::infrastructure::services::gpu_transcoder_client::GpuTranscoderClient;
use vidshare::presentation::routes;
use vidshare::presentation::state::AppState;
use vidshare::utils::telemetry;
use vidshare::workers::publish_scheduler_worker::PublishSchedulerWorker;
use vidshare::workers::retention_worker::RetentionWorker;
use vidshare::workers::transcode_poller::TranscodePoller;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting vidshare...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    if settings.metrics.enabled {
        vidshare::infrastructure::metrics::init_metrics(&settings.metrics.listen_addr);
    }

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    if settings.database.run_migrations {
        info!("Running database migrations...");
        Migrator::up(db.as_ref(), None).await?;
        info!("Database migrations applied");
    }

    // 4. Assemble services
    let transcoder = Arc::new(GpuTranscoderClient::new(&settings.transcoder));
    let state = AppState::new(db.clone(), settings.clone(), transcoder);

    match (
        settings.auth.bootstrap_admin_username.as_deref(),
        settings.auth.bootstrap_admin_password.as_deref(),
    ) {
        (Some(username), Some(password)) => {
            if let Some(admin) = state.users.ensure_bootstrap_admin(username, password).await? {
                info!("Bootstrap admin {} created", admin.username);
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("Both bootstrap admin username and password must be set; skipping");
        }
        (None, None) => {}
    }

    // 5. Start workers
    if settings.scheduler.enabled {
        PublishSchedulerWorker::new(
            state.scheduler.clone(),
            Duration::from_secs(settings.scheduler.interval_seconds),
        )
        .start();
    }
    RetentionWorker::new(
        state.retention.clone(),
        Duration::from_secs(settings.retention.worker_interval_seconds),
    )
    .start();
    TranscodePoller::new(
        state.transcode.clone(),
        Duration::from_secs(settings.transcoder.poll_interval_seconds),
    )
    .start();
    if settings.rate_limiting.enabled {
        state.rate_limiter.spawn_cleanup();
    }

    // 6. Start HTTP server
    let app = routes::routes(&state);

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
