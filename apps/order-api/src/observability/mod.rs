//! Metrics instrumentation.

pub mod metrics;

pub use metrics::{init_metrics, record_order_state_change, MetricsConfig, MetricsError};
