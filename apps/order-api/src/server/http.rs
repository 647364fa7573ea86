//! HTTP/JSON API server implementation.
//!
//! Two business endpoints plus a health check. Every service error kind
//! (injected fault, store failure) surfaces as a 500 with a
//! human-readable reason; telemetry recording never masks the original
//! error response.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::fault::RandomSource;
use crate::service::{OrderService, ServiceError};
use crate::store::OrderStore;

/// Create the Axum router with all endpoints.
pub fn create_router<S, R>(service: Arc<OrderService<S, R>>) -> Router
where
    S: OrderStore + 'static,
    R: RandomSource + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/novo_pedido", post(novo_pedido::<S, R>))
        .route("/fechar_pedido", post(fechar_pedido::<S, R>))
        .with_state(service)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Response for a successfully opened order.
#[derive(Debug, Serialize, Deserialize)]
pub struct NovoPedidoResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Resulting order state, always `"aberto"`.
    pub pedido: String,
}

/// Open one order.
async fn novo_pedido<S, R>(
    State(service): State<Arc<OrderService<S, R>>>,
) -> Result<Json<NovoPedidoResponse>, ApiError>
where
    S: OrderStore + 'static,
    R: RandomSource + 'static,
{
    let opened = service.open_order().await?;
    tracing::debug!(order_id = opened.id, "novo_pedido handled");

    Ok(Json(NovoPedidoResponse {
        status: "ok".to_string(),
        pedido: "aberto".to_string(),
    }))
}

/// Response for a bulk close.
#[derive(Debug, Serialize, Deserialize)]
pub struct FecharPedidoResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Number of orders transitioned to closed; zero is valid.
    pub pedidos_fechados: u64,
}

/// Close all currently-open orders.
async fn fechar_pedido<S, R>(
    State(service): State<Arc<OrderService<S, R>>>,
) -> Result<Json<FecharPedidoResponse>, ApiError>
where
    S: OrderStore + 'static,
    R: RandomSource + 'static,
{
    let affected = service.close_open_orders().await?;

    Ok(Json(FecharPedidoResponse {
        status: "ok".to_string(),
        pedidos_fechados: affected,
    }))
}

/// Error payload returned on failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `"error"`.
    pub status: String,
    /// Human-readable reason, including the drawn value for injected
    /// faults.
    pub error: String,
}

/// API error wrapper mapping service errors onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // All error kinds (injected fault, store failure) are server
        // errors in this design.
        let body = ErrorResponse {
            status: "error".to_string(),
            error: self.0.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::fault::FaultInjector;
    use crate::store::InMemoryOrderStore;

    /// Always returns the same draw.
    struct FixedSource(u8);

    impl RandomSource for FixedSource {
        fn draw(&self) -> u8 {
            self.0
        }
    }

    fn make_app(draw: u8) -> Router {
        let store = Arc::new(InMemoryOrderStore::new());
        let service = Arc::new(OrderService::with_injector(
            store,
            FaultInjector::new(FixedSource(draw)),
        ));
        create_router(service)
    }

    fn post_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let app = make_app(0);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn novo_pedido_returns_ok_payload() {
        let app = make_app(0);

        let response = app.oneshot(post_request("/novo_pedido")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"status": "ok", "pedido": "aberto"}));
    }

    #[tokio::test]
    async fn fechar_pedido_reports_zero_when_nothing_open() {
        let app = make_app(0);

        let response = app.oneshot(post_request("/fechar_pedido")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"status": "ok", "pedidos_fechados": 0})
        );
    }

    #[tokio::test]
    async fn injected_fault_maps_to_500_with_reason() {
        let app = make_app(5);

        let response = app.oneshot(post_request("/novo_pedido")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "error");
        assert_eq!(body.error, "Erro injetado (valor=5)");
    }
}
