//! MySQL implementation of the order store.
//!
//! One short-lived connection per business call, single-statement
//! autocommit transactions, and a bounded connect-with-retry loop gating
//! service readiness at startup.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};

use super::{ConnectRetryPolicy, OrderStore, StoreError};
use crate::config::StoreConfig;
use crate::models::OrderStatus;

/// MySQL-backed [`OrderStore`].
///
/// Holds only the connect options; connections are opened per call and
/// closed on every exit path. No pooling in this design.
#[derive(Debug, Clone)]
pub struct MySqlOrderStore {
    options: MySqlConnectOptions,
}

impl MySqlOrderStore {
    /// Build a store from connect options without probing the backend.
    #[must_use]
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self { options }
    }

    /// Establish connectivity with bounded retries.
    ///
    /// Attempts up to `policy.max_attempts` connections, sleeping
    /// `policy.delay` between failures. The first successful probe
    /// connection is closed immediately; the store never reuses it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] once the attempt budget is
    /// exhausted. Callers must treat this as fatal: the service must not
    /// serve traffic without a reachable store.
    pub async fn connect_with_retry(
        config: &StoreConfig,
        policy: &ConnectRetryPolicy,
    ) -> Result<Self, StoreError> {
        let options = config.connect_options();

        for attempt in 1..=policy.max_attempts {
            match options.connect().await {
                Ok(conn) => {
                    let _ = conn.close().await;
                    tracing::info!(attempt, "connected to MySQL");
                    return Ok(Self::new(options));
                }
                Err(err) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        error = %err,
                        "MySQL connection attempt failed"
                    );
                    if attempt < policy.max_attempts {
                        tokio::time::sleep(policy.delay).await;
                    }
                }
            }
        }

        Err(StoreError::Unavailable {
            attempts: policy.max_attempts,
        })
    }

    async fn connect(&self) -> Result<MySqlConnection, StoreError> {
        self.options
            .connect()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[async_trait]
impl OrderStore for MySqlOrderStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            "CREATE TABLE IF NOT EXISTS pedidos (
              id INT AUTO_INCREMENT PRIMARY KEY,
              status VARCHAR(20),
              criado_em TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&mut conn)
        .await;

        match result {
            Ok(_) => {
                conn.close().await?;
                tracing::debug!(table = "pedidos", "schema ensured");
                Ok(())
            }
            Err(err) => {
                let _ = conn.close().await;
                Err(StoreError::Query(err.to_string()))
            }
        }
    }

    async fn open_order(&self) -> Result<u64, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("INSERT INTO pedidos (status) VALUES (?)")
            .bind(OrderStatus::Open.as_str())
            .execute(&mut conn)
            .await;

        match result {
            Ok(done) => {
                conn.close().await?;
                Ok(done.last_insert_id())
            }
            Err(err) => {
                let _ = conn.close().await;
                Err(StoreError::Query(err.to_string()))
            }
        }
    }

    async fn close_open_orders(&self) -> Result<u64, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("UPDATE pedidos SET status = ? WHERE status = ?")
            .bind(OrderStatus::Closed.as_str())
            .bind(OrderStatus::Open.as_str())
            .execute(&mut conn)
            .await;

        match result {
            Ok(done) => {
                conn.close().await?;
                Ok(done.rows_affected())
            }
            Err(err) => {
                let _ = conn.close().await;
                Err(StoreError::Query(err.to_string()))
            }
        }
    }
}
