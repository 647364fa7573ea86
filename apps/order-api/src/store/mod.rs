//! Order store gateway.
//!
//! Owns the connection lifecycle to the relational backend. Each business
//! call acquires a fresh connection, performs exactly one statement plus
//! commit, and releases the connection before returning.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod mysql;

pub use memory::InMemoryOrderStore;
pub use mysql::MySqlOrderStore;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store unreachable after the bounded startup retries. Fatal.
    #[error("store unavailable after {attempts} connection attempts")]
    Unavailable {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// Connection establishment or teardown failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Statement execution or commit failure.
    #[error("query error: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Connection(err.to_string())
    }
}

/// Startup connection retry policy: bounded attempts with a fixed delay.
#[derive(Debug, Clone)]
pub struct ConnectRetryPolicy {
    /// Maximum number of connection attempts (default: 10).
    pub max_attempts: u32,
    /// Fixed sleep between attempts (default: 5s).
    pub delay: Duration,
}

impl Default for ConnectRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(5),
        }
    }
}

/// Driven port for the order table.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Idempotently create the order table if absent.
    ///
    /// Safe to call on every startup; never destructive to existing rows.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Insert one order with `status = aberto` and return its assigned id.
    async fn open_order(&self) -> Result<u64, StoreError>;

    /// Transition every currently-open order to `fechado` in one statement.
    ///
    /// Returns the number of rows changed; zero is a valid result, not an
    /// error.
    async fn close_open_orders(&self) -> Result<u64, StoreError>;
}
