//! HTTP surface for the trigger service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::client::{OrderApiClient, TriggerError};

/// Create the Axum router.
pub fn create_router(client: Arc<OrderApiClient>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/trigger", post(trigger))
        .with_state(client)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Response for a completed cycle.
#[derive(Debug, Serialize, Deserialize)]
pub struct TriggerResponse {
    /// Always `"done"`.
    pub status: String,
}

/// Drive one order cycle against the order API.
async fn trigger(
    State(client): State<Arc<OrderApiClient>>,
) -> Result<Json<TriggerResponse>, ApiError> {
    client.trigger().await?;

    Ok(Json(TriggerResponse {
        status: "done".to_string(),
    }))
}

/// Error payload returned on failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

/// API error wrapper mapping trigger errors onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(TriggerError);

impl From<TriggerError> for ApiError {
    fn from(error: TriggerError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse {
            error: self.0.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
