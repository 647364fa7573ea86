//! Order API Binary
//!
//! Starts the order lifecycle service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin order-api
//! ```
//!
//! # Environment Variables
//!
//! - `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASS` / `DB_NAME`: MySQL
//!   connection (defaults: mysql / 3306 / app / apppass / pedidos_db)
//! - `HTTP_PORT`: HTTP server port (default: 5000)
//! - `METRICS_ADDR`: Prometheus listener (default: 0.0.0.0:9090)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP collector endpoint
//! - `OTEL_SERVICE_NAME`: service name label (default: order-api)
//! - `RUST_LOG`: log level (default: info)
//!
//! Startup gates readiness on store availability: 10 connection attempts
//! with 5 s between them, then a non-zero exit without serving.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use order_api::config::AppConfig;
use order_api::observability::{init_metrics, MetricsConfig};
use order_api::server::create_router;
use order_api::service::OrderService;
use order_api::store::{MySqlOrderStore, OrderStore};
use order_api::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _guard = telemetry::init();

    tracing::info!("Starting order API");

    let config = AppConfig::from_env();
    tracing::info!(
        db_host = %config.store.host,
        db_name = %config.store.database,
        http_port = config.server.http_port,
        "Configuration loaded"
    );

    // Telemetry loss is acceptable; a dead metrics listener must not keep
    // the service from starting.
    if let Err(e) = init_metrics(&MetricsConfig::with_addr(config.server.metrics_addr)) {
        tracing::warn!(error = %e, "metrics exporter failed to start, continuing without it");
    }

    let store = MySqlOrderStore::connect_with_retry(&config.store, &config.retry)
        .await
        .context("store unreachable, refusing to serve")?;

    store
        .ensure_schema()
        .await
        .context("schema bootstrap failed")?;

    let service = Arc::new(OrderService::new(Arc::new(store)));
    let app = create_router(service);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.server.http_port)
        .parse()
        .context("invalid HTTP listen address")?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /novo_pedido");
    tracing::info!("  POST /fechar_pedido");

    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind HTTP listener")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Order API stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed; failing fast at startup
/// beats an unresponsive process.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
