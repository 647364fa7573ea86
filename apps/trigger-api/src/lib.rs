// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Trigger API - Core Library
//!
//! Upstream service that drives full order cycles against the order API:
//! one `POST /trigger` endpoint that opens an order and then closes all
//! open orders, propagating downstream failures (including injected
//! faults) as server errors.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Order API HTTP client.
pub mod client;

/// HTTP surface.
pub mod http;

/// OpenTelemetry tracing setup.
pub mod telemetry;

pub use client::{OrderApiClient, TriggerError};
pub use http::create_router;
