//! Stage Invoker — one POST per external capability call.
//!
//! Transport failures, non-success statuses, and unparseable bodies all come
//! back as `{"error": <message>}` rather than an `Err`. That uniform shape is
//! what the orchestrator inspects to decide pipeline continuation.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Default ceiling per capability call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
enum InvokeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("capability returned status {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Clone)]
pub struct StageInvoker {
    client: Client,
}

impl StageInvoker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Calls one capability endpoint with a JSON payload. Never raises:
    /// every failure mode collapses into the uniform error value.
    pub async fn invoke(&self, endpoint: &str, payload: &Value) -> Value {
        match self.post(endpoint, payload).await {
            Ok(body) => body,
            Err(e) => {
                warn!("stage call to {endpoint} failed: {e}");
                json!({ "error": e.to_string() })
            }
        }
    }

    async fn post(&self, endpoint: &str, payload: &Value) -> Result<Value, InvokeError> {
        let response = self.client.post(endpoint).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InvokeError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<Value>().await?;
        debug!("stage call to {endpoint} succeeded");
        Ok(body)
    }
}

impl Default for StageInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
