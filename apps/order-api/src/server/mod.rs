//! HTTP surface.

pub mod http;

pub use http::{create_router, ApiError};
