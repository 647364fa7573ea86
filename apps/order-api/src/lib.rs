// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_precision_loss,
        clippy::cast_lossless
    )
)]

//! Order API - Core Library
//!
//! Minimal order-lifecycle service instrumented end-to-end: one trace
//! span per business operation, one counter increment per committed state
//! change, and a deliberate random-fault injector used to exercise
//! observability pipelines under synthetic failure.
//!
//! # Modules
//!
//! - [`models`]: the order entity and its two-state lifecycle
//! - [`store`]: connection-per-call MySQL gateway behind the
//!   [`store::OrderStore`] port, plus an in-memory test double
//! - [`fault`]: fixed-policy random fault injection behind an injectable
//!   random source
//! - [`service`]: the two business operations and their instrumentation
//!   contract
//! - [`server`]: axum HTTP surface
//! - [`telemetry`] / [`observability`]: OTLP span export and Prometheus
//!   counters
//! - [`config`]: environment-driven configuration with built-in defaults

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Environment-driven configuration.
pub mod config;

/// Random fault injection.
pub mod fault;

/// Order entity and lifecycle states.
pub mod models;

/// Metrics instrumentation.
pub mod observability;

/// HTTP surface.
pub mod server;

/// Business operations.
pub mod service;

/// Order store gateway.
pub mod store;

/// OpenTelemetry tracing setup.
pub mod telemetry;

pub use config::{AppConfig, ServerConfig, StoreConfig};
pub use fault::{FaultDecision, FaultInjector, RandomSource, ThreadRngSource};
pub use models::{OrderRecord, OrderStatus};
pub use server::create_router;
pub use service::{OrderService, ServiceError};
pub use store::{ConnectRetryPolicy, InMemoryOrderStore, MySqlOrderStore, OrderStore, StoreError};
