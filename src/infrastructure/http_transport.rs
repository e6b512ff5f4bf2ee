//! HTTP completion transport backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::application::{CompletionRequest, CompletionTransport, TransportError, TransportResponse};
use crate::domain::{AppError, Result};

const JSON_MIME_TYPE: &str = "application/json";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends completion requests over HTTPS. One attempt per call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a shared connection pool.
    ///
    /// # Errors
    /// Returns error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("ixia/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppError::http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn post_json(
        &self,
        request: &CompletionRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .bearer_auth(&request.token)
            .header(CONTENT_TYPE, JSON_MIME_TYPE)
            .header(ACCEPT, JSON_MIME_TYPE)
            .json(&request.body)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(map_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_error)?;

        tracing::debug!(status, bytes = body.len(), "Completion response received");

        Ok(TransportResponse { status, body })
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err.to_string())
    }
}
