//! Prometheus metrics for the order service.
//!
//! One counter, `orders_count`, tagged with the resulting order state.
//! Recording is a non-blocking enqueue into the installed recorder; if no
//! recorder is installed (tests, exporter failure) increments are dropped
//! silently and never fail the business operation.

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::models::OrderStatus;

/// Counter of order state changes, tagged by resulting state.
const ORDERS_COUNT: &str = "orders_count";

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
}

impl MetricsConfig {
    /// Create a metrics configuration for the given address.
    #[must_use]
    pub const fn with_addr(addr: SocketAddr) -> Self {
        Self { listen_addr: addr }
    }
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install the metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Initialize the Prometheus metrics exporter.
///
/// Starts an HTTP server exposing metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the exporter fails to start (e.g., port in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    describe_counter!(ORDERS_COUNT, "Número de pedidos por estado resultante");

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Record a committed order state change.
///
/// `delta` is the number of rows that entered `status`; a delta of zero is
/// still recorded so bulk closes with nothing to close stay visible.
/// Must only be called after the store mutation has committed.
pub fn record_order_state_change(status: OrderStatus, delta: u64) {
    counter!(ORDERS_COUNT, "status" => status.as_str()).increment(delta);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_with_addr() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        assert_eq!(MetricsConfig::with_addr(addr).listen_addr.port(), 8080);
    }

    #[test]
    fn record_without_recorder_does_not_panic() {
        record_order_state_change(OrderStatus::Open, 1);
        record_order_state_change(OrderStatus::Closed, 0);
    }
}
