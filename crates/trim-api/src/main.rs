//! Axum API server binary.

use std::net::SocketAddr;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trim_api::{create_router, metrics, ApiConfig, AppState};
use trim_pipeline::PipelineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("trim=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting trim-api");

    let config = ApiConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();
    info!(
        "API config: host={}, port={}, work_dir={}, output_dir={}",
        config.host,
        config.port,
        pipeline_config.work_dir.display(),
        pipeline_config.output_dir.display()
    );
    if config.is_production() {
        info!("Production mode: tool output is hidden from error responses");
    }

    tokio::fs::create_dir_all(&pipeline_config.work_dir)
        .await
        .with_context(|| format!("creating {}", pipeline_config.work_dir.display()))?;
    tokio::fs::create_dir_all(&pipeline_config.output_dir)
        .await
        .with_context(|| format!("creating {}", pipeline_config.output_dir.display()))?;

    let metrics_handle = if config.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => {
                info!("Prometheus metrics enabled at /metrics");
                Some(handle)
            }
            Err(e) => {
                error!("Failed to install metrics recorder: {}", e);
                None
            }
        }
    } else {
        None
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid bind address")?;

    let state = AppState::new(config, pipeline_config);
    let app = create_router(state, metrics_handle);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
