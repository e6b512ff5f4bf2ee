//! Seams between the dispatcher and the outside world.
//!
//! The dispatcher only sees these traits; concrete adapters live in the
//! infrastructure layer and tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Remote completion settings, queried fresh on every attempt.
pub trait ConfigProvider: Send + Sync {
    /// Bearer token, or `None` when remote completion is not configured.
    fn access_token(&self) -> Option<String>;

    /// Base URL the model name is appended to.
    fn base_url(&self) -> String;

    /// Upper bound for one completion round-trip.
    fn timeout(&self) -> Duration;

    /// Model used for chat completions, e.g. `tiiuae/falcon-7b-instruct`.
    fn chat_model_name(&self) -> String;
}

/// One POST to a completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub url: String,
    pub token: String,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

/// Status and raw body of a finished request.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Request(String),
}

/// Sends completion requests.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Issue a single JSON POST. Implementations must not retry.
    async fn post_json(
        &self,
        request: &CompletionRequest,
    ) -> Result<TransportResponse, TransportError>;
}
