//! HTTP client for the order API.

use thiserror::Error;

/// Errors from a trigger cycle.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// Transport-level failure reaching the order API.
    #[error("request to order API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The order API answered with a non-success status.
    #[error("order API returned {status} from /{endpoint}")]
    Upstream {
        /// The endpoint that failed.
        endpoint: &'static str,
        /// The HTTP status code received.
        status: u16,
    },
}

/// Client driving one full order cycle against the order API.
#[derive(Debug, Clone)]
pub struct OrderApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl OrderApiClient {
    /// Create a client for the order API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Run one cycle: open an order, then close all open orders.
    ///
    /// The second call is only made when the first succeeded, so a faulted
    /// open never triggers a close.
    pub async fn trigger(&self) -> Result<(), TriggerError> {
        self.post("novo_pedido").await?;
        self.post("fechar_pedido").await?;
        Ok(())
    }

    async fn post(&self, endpoint: &'static str) -> Result<(), TriggerError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let response = self.http.post(&url).send().await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(endpoint, "order API call succeeded");
            Ok(())
        } else {
            tracing::warn!(endpoint, status = status.as_u16(), "order API call failed");
            Err(TriggerError::Upstream {
                endpoint,
                status: status.as_u16(),
            })
        }
    }
}
