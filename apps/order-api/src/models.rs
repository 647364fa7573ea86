//! Order data model.
//!
//! A single entity with a two-state lifecycle: every order is created
//! `aberto` (open) and the only legal transition is the bulk close to
//! `fechado` (closed). Closed is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an order.
///
/// The string labels are the persisted column values and the metric tag
/// vocabulary, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Newly created, not yet closed.
    Open,
    /// Terminal state. No outgoing transitions.
    Closed,
}

impl OrderStatus {
    /// Stable label used in the `status` column and the `orders_count` tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "aberto",
            Self::Closed => "fechado",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    /// Store-assigned id, unique and monotonically increasing.
    pub id: u64,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Assigned once at creation, immutable.
    pub created_at: DateTime<Utc>,
}
