//! Trigger API Binary
//!
//! # Environment Variables
//!
//! - `ORDER_API_ENDPOINT`: base URL of the order API (default: `http://localhost:5000`)
//! - `HTTP_PORT`: HTTP server port (default: 4000)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP collector endpoint
//! - `OTEL_SERVICE_NAME`: service name label (default: trigger-api)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use trigger_api::client::OrderApiClient;
use trigger_api::http::create_router;
use trigger_api::telemetry;

/// Default HTTP server port.
const DEFAULT_HTTP_PORT: u16 = 4000;

/// Default order API base URL.
const DEFAULT_ORDER_API_ENDPOINT: &str = "http://localhost:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _guard = telemetry::init();

    let order_api_endpoint = std::env::var("ORDER_API_ENDPOINT")
        .unwrap_or_else(|_| DEFAULT_ORDER_API_ENDPOINT.to_string());

    let http_port: u16 = std::env::var("HTTP_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HTTP_PORT);

    tracing::info!(
        order_api = %order_api_endpoint,
        http_port,
        "Starting trigger API"
    );

    let client = Arc::new(OrderApiClient::new(order_api_endpoint));
    let app = create_router(client);

    let addr: SocketAddr = format!("0.0.0.0:{http_port}")
        .parse()
        .context("invalid HTTP listen address")?;

    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind HTTP listener")?;

    tracing::info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Trigger API stopped");
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
