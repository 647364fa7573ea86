//! Order service orchestration.
//!
//! Both business operations follow the same template: one trace span per
//! operation, fault-injection check before any store interaction, a store
//! mutation on a fresh connection, and a counter increment only after the
//! mutation committed. Failures of either kind are recorded on the span
//! before it closes.

use std::sync::Arc;

use thiserror::Error;
use tracing::{field, Instrument, Span};

use crate::fault::{FaultDecision, FaultInjector, RandomSource, ThreadRngSource};
use crate::models::OrderStatus;
use crate::observability::record_order_state_change;
use crate::store::{OrderStore, StoreError};

/// Errors surfaced by the business operations.
///
/// Every kind maps to a server error (500) at the HTTP boundary; none are
/// retried within the request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Synthetic failure from the fault injector. The store was never
    /// touched and no counter was incremented.
    #[error("Erro injetado (valor={value})")]
    InjectedFault {
        /// The drawn value, kept for diagnostics.
        value: u8,
    },

    /// Failure during connect, execute, or commit inside an operation.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of a successful open operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenedOrder {
    /// Store-assigned order id.
    pub id: u64,
}

/// Implements the two lifecycle operations over an order store.
pub struct OrderService<S, R: RandomSource> {
    store: Arc<S>,
    injector: FaultInjector<R>,
}

impl<S: OrderStore> OrderService<S, ThreadRngSource> {
    /// Create a service with the production fault policy.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_injector(store, FaultInjector::default())
    }
}

impl<S: OrderStore, R: RandomSource> OrderService<S, R> {
    /// Create a service with an explicit injector (tests substitute a
    /// deterministic random source here).
    pub const fn with_injector(store: Arc<S>, injector: FaultInjector<R>) -> Self {
        Self { store, injector }
    }

    /// Open one order.
    ///
    /// Inserts a row with `status = aberto` and increments `orders_count`
    /// for the open state by exactly one.
    pub async fn open_order(&self) -> Result<OpenedOrder, ServiceError> {
        let span = tracing::info_span!(
            "novo_pedido",
            otel.status_code = field::Empty,
            error.message = field::Empty,
        );

        let result = async {
            self.check_fault()?;

            let id = self.store.open_order().await?;
            record_order_state_change(OrderStatus::Open, 1);
            tracing::info!(order_id = id, "pedido aberto");
            Ok(OpenedOrder { id })
        }
        .instrument(span.clone())
        .await;

        Self::record_outcome(&span, &result);
        result
    }

    /// Close every currently-open order in one bulk transition.
    ///
    /// Returns the number of rows changed and increments `orders_count`
    /// for the closed state by that amount, even when it is zero.
    pub async fn close_open_orders(&self) -> Result<u64, ServiceError> {
        let span = tracing::info_span!(
            "fechar_pedido",
            otel.status_code = field::Empty,
            error.message = field::Empty,
        );

        let result = async {
            self.check_fault()?;

            let affected = self.store.close_open_orders().await?;
            record_order_state_change(OrderStatus::Closed, affected);
            tracing::info!(pedidos_fechados = affected, "pedidos fechados");
            Ok(affected)
        }
        .instrument(span.clone())
        .await;

        Self::record_outcome(&span, &result);
        result
    }

    /// Consult the fault injector; aborts the operation before any store
    /// interaction when the decision is to fail.
    fn check_fault(&self) -> Result<(), ServiceError> {
        match self.injector.maybe_fail() {
            FaultDecision::Pass { .. } => Ok(()),
            FaultDecision::Fail { value } => Err(ServiceError::InjectedFault { value }),
        }
    }

    /// Mark the span errored so injected faults and store failures stay
    /// visible in traces.
    fn record_outcome<T>(span: &Span, result: &Result<T, ServiceError>) {
        if let Err(err) = result {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", field::display(err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Mutex;

    use metrics::{
        Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };

    use crate::store::InMemoryOrderStore;

    /// Always returns the same draw.
    struct FixedSource(u8);

    impl RandomSource for FixedSource {
        fn draw(&self) -> u8 {
            self.0
        }
    }

    /// Store whose operations always fail.
    struct BrokenStore;

    #[async_trait]
    impl OrderStore for BrokenStore {
        async fn ensure_schema(&self) -> Result<(), StoreError> {
            Err(StoreError::Connection("connection refused".into()))
        }

        async fn open_order(&self) -> Result<u64, StoreError> {
            Err(StoreError::Query("connection dropped".into()))
        }

        async fn close_open_orders(&self) -> Result<u64, StoreError> {
            Err(StoreError::Query("connection dropped".into()))
        }
    }

    fn passing_service(store: Arc<InMemoryOrderStore>) -> OrderService<InMemoryOrderStore, FixedSource> {
        OrderService::with_injector(store, FaultInjector::new(FixedSource(0)))
    }

    #[tokio::test]
    async fn open_order_creates_one_open_row() {
        let store = Arc::new(InMemoryOrderStore::new());
        let service = passing_service(Arc::clone(&store));

        let opened = service.open_order().await.unwrap();
        assert_eq!(opened.id, 1);
        assert_eq!(store.count_with_status(OrderStatus::Open), 1);
    }

    #[tokio::test]
    async fn close_reports_transitioned_count() {
        let store = Arc::new(InMemoryOrderStore::new());
        let service = passing_service(Arc::clone(&store));

        for _ in 0..3 {
            service.open_order().await.unwrap();
        }

        assert_eq!(service.close_open_orders().await.unwrap(), 3);
        // Idempotent: nothing left to close.
        assert_eq!(service.close_open_orders().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn injected_fault_aborts_before_store_mutation() {
        let store = Arc::new(InMemoryOrderStore::new());
        let service =
            OrderService::with_injector(Arc::clone(&store), FaultInjector::new(FixedSource(5)));

        let err = service.open_order().await.unwrap_err();
        assert!(matches!(err, ServiceError::InjectedFault { value: 5 }));
        assert!(store.is_empty());

        let err = service.close_open_orders().await.unwrap_err();
        assert!(matches!(err, ServiceError::InjectedFault { value: 5 }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn injected_fault_reason_carries_drawn_value() {
        let store = Arc::new(InMemoryOrderStore::new());
        let service =
            OrderService::with_injector(Arc::clone(&store), FaultInjector::new(FixedSource(7)));

        let err = service.open_order().await.unwrap_err();
        assert_eq!(err.to_string(), "Erro injetado (valor=7)");
    }

    #[tokio::test]
    async fn store_errors_propagate_uncaught() {
        let service =
            OrderService::with_injector(Arc::new(BrokenStore), FaultInjector::new(FixedSource(0)));

        assert!(matches!(
            service.open_order().await.unwrap_err(),
            ServiceError::Store(StoreError::Query(_))
        ));
        assert!(matches!(
            service.close_open_orders().await.unwrap_err(),
            ServiceError::Store(StoreError::Query(_))
        ));
    }

    /// Recorder capturing every `orders_count` increment, keyed by the
    /// `status` label, delta by delta.
    #[derive(Default)]
    struct CapturingRecorder {
        deltas: Arc<Mutex<HashMap<String, Vec<u64>>>>,
    }

    struct CapturedCounter {
        status: String,
        deltas: Arc<Mutex<HashMap<String, Vec<u64>>>>,
    }

    impl CounterFn for CapturedCounter {
        fn increment(&self, value: u64) {
            self.deltas
                .lock()
                .unwrap()
                .entry(self.status.clone())
                .or_default()
                .push(value);
        }

        fn absolute(&self, _value: u64) {}
    }

    impl Recorder for CapturingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let status = key
                .labels()
                .find(|label| label.key() == "status")
                .map(|label| label.value().to_string())
                .unwrap_or_default();
            Counter::from_arc(Arc::new(CapturedCounter {
                status,
                deltas: Arc::clone(&self.deltas),
            }))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn counters_track_only_committed_state_changes() {
        // Draws: two passing opens, a fault on the third open, then two
        // passing closes.
        struct Draws(AtomicU8);

        impl RandomSource for Draws {
            fn draw(&self) -> u8 {
                match self.0.fetch_add(1, Ordering::SeqCst) {
                    2 => 7,
                    _ => 0,
                }
            }
        }

        let recorder = CapturingRecorder::default();
        let deltas = Arc::clone(&recorder.deltas);
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        // Local recorders are thread-bound; the current-thread runtime
        // keeps the service calls on this thread.
        metrics::with_local_recorder(&recorder, || {
            rt.block_on(async {
                let store = Arc::new(InMemoryOrderStore::new());
                let service = OrderService::with_injector(
                    store,
                    FaultInjector::new(Draws(AtomicU8::new(0))),
                );

                service.open_order().await.unwrap();
                service.open_order().await.unwrap();
                service.open_order().await.unwrap_err();
                assert_eq!(service.close_open_orders().await.unwrap(), 2);
                assert_eq!(service.close_open_orders().await.unwrap(), 0);
            });
        });

        let deltas = deltas.lock().unwrap();
        // One +1 per successful open; the faulted call recorded nothing.
        assert_eq!(deltas["aberto"], vec![1, 1]);
        // Closes record the affected count, the zero-delta one included.
        assert_eq!(deltas["fechado"], vec![2, 0]);
    }

    #[tokio::test]
    async fn fault_decision_is_checked_on_every_call() {
        // Draw sequence: pass, fail, pass.
        struct SequenceSource(AtomicU8);

        impl RandomSource for SequenceSource {
            fn draw(&self) -> u8 {
                match self.0.fetch_add(1, Ordering::SeqCst) {
                    1 => 7,
                    _ => 0,
                }
            }
        }

        let store = Arc::new(InMemoryOrderStore::new());
        let service = OrderService::with_injector(
            Arc::clone(&store),
            FaultInjector::new(SequenceSource(AtomicU8::new(0))),
        );

        assert!(service.open_order().await.is_ok());
        assert!(service.open_order().await.is_err());
        assert!(service.open_order().await.is_ok());
        assert_eq!(store.count_with_status(OrderStatus::Open), 2);
    }
}
