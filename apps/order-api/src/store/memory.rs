//! In-memory order store for testing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::{OrderStore, StoreError};
use crate::models::{OrderRecord, OrderStatus};

/// In-memory implementation of [`OrderStore`].
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<OrderRecord>>,
    next_id: AtomicU64,
}

impl InMemoryOrderStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Total number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().unwrap().is_empty()
    }

    /// Number of rows currently in the given state.
    #[must_use]
    pub fn count_with_status(&self, status: OrderStatus) -> usize {
        self.orders
            .read()
            .unwrap()
            .iter()
            .filter(|o| o.status == status)
            .count()
    }

    /// Snapshot of all rows (for test assertions).
    #[must_use]
    pub fn snapshot(&self) -> Vec<OrderRecord> {
        self.orders.read().unwrap().clone()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn open_order(&self) -> Result<u64, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.orders.write().unwrap().push(OrderRecord {
            id,
            status: OrderStatus::Open,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn close_open_orders(&self) -> Result<u64, StoreError> {
        let mut orders = self.orders.write().unwrap();
        let mut affected = 0u64;
        for order in orders.iter_mut() {
            if order.status == OrderStatus::Open {
                order.status = OrderStatus::Closed;
                affected += 1;
            }
        }
        Ok(affected)
    }
}
