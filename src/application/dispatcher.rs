//! Response dispatch.
//!
//! Routes a message to the math, creative or chat model. Chat tries the
//! remote completion endpoint once and falls back to the local keyword
//! model on any failure; nothing raised by the remote step reaches the
//! caller.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::domain::{ModelSelector, RemoteFailure, Reply, ResponsePayload, ResponseSource};

use super::creative::creative_response;
use super::evaluator::math_response;
use super::keywords::{chat_response, KeywordTable};
use super::parser::{parse_completion_payload, CompletionPayload};
use super::ports::{
    CompletionRequest, CompletionTransport, ConfigProvider, TransportError, TransportResponse,
};

/// Notice attached to a reply produced locally after a remote failure.
pub const REMOTE_FALLBACK_NOTICE: &str =
    "I'm having trouble reaching the AI service right now. Let's keep chatting locally while you try again.";

/// Reply when neither the remote service nor a local chat model exist.
pub const CHAT_UNAVAILABLE_REPLY: &str = "Chat model is currently unavailable.";

/// Join the base URL and a model name, percent-encoding each path segment.
#[must_use]
pub fn completion_url(base_url: &str, model: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    let encoded = model
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{base}/{encoded}")
}

/// Chooses and runs the reply engine for each message.
pub struct Dispatcher {
    config: Arc<dyn ConfigProvider>,
    transport: Arc<dyn CompletionTransport>,
    table: Option<KeywordTable>,
    typing_delay: Duration,
}

impl Dispatcher {
    /// Create a dispatcher with a local chat model.
    #[must_use]
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        transport: Arc<dyn CompletionTransport>,
        table: KeywordTable,
    ) -> Self {
        Self {
            config,
            transport,
            table: Some(table),
            typing_delay: Duration::ZERO,
        }
    }

    /// Create a dispatcher that has only the remote chat model.
    #[must_use]
    pub fn without_local_chat(
        config: Arc<dyn ConfigProvider>,
        transport: Arc<dyn CompletionTransport>,
    ) -> Self {
        Self {
            config,
            transport,
            table: None,
            typing_delay: Duration::ZERO,
        }
    }

    /// Pause before every reply.
    #[must_use]
    pub const fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    /// Reply to `message` using the model named by `model_tag`.
    ///
    /// Unrecognized tags use the chat model.
    pub async fn get_response(&self, message: &str, model_tag: &str) -> Reply {
        self.respond(message, ModelSelector::resolve(model_tag)).await
    }

    /// Reply to `message` using an already resolved model.
    pub async fn respond(&self, message: &str, model: ModelSelector) -> Reply {
        if !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }

        match model {
            ModelSelector::Math => Reply::Text(math_response(message)),
            ModelSelector::Creative => {
                let text = creative_response(message, &mut rand::thread_rng());
                Reply::Text(text)
            }
            ModelSelector::Chat => self.chat(message).await,
        }
    }

    async fn chat(&self, message: &str) -> Reply {
        let failure = match self.request_completion(message).await {
            Ok(payload) => return Reply::Payload(payload),
            Err(failure) => failure,
        };

        // A missing token is a silent skip, not a failure worth reporting.
        let silent = failure == RemoteFailure::Unavailable;
        if !silent {
            tracing::warn!(reason = %failure, "Falling back to local chat model");
        }

        let Some(table) = &self.table else {
            return if silent {
                Reply::Text(CHAT_UNAVAILABLE_REPLY.to_string())
            } else {
                Reply::Payload(ResponsePayload {
                    text: REMOTE_FALLBACK_NOTICE.to_string(),
                    source: ResponseSource::Static,
                    notice: None,
                    error: Some(failure.to_string()),
                    raw: None,
                })
            };
        };

        let text = chat_response(table, message, &mut rand::thread_rng());
        if silent {
            return Reply::Text(text);
        }

        Reply::Payload(ResponsePayload {
            text,
            source: ResponseSource::LocalFallback,
            notice: Some(REMOTE_FALLBACK_NOTICE.to_string()),
            error: Some(failure.to_string()),
            raw: None,
        })
    }

    /// One remote completion attempt. Never retried.
    async fn request_completion(&self, message: &str) -> Result<ResponsePayload, RemoteFailure> {
        let token = self
            .config
            .access_token()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                tracing::warn!(
                    "Access token missing; set HUGGINGFACE_TOKEN or remote.token to enable remote completions"
                );
                RemoteFailure::Unavailable
            })?;

        let timeout = self.config.timeout();
        let url = completion_url(&self.config.base_url(), &self.config.chat_model_name());
        let request = CompletionRequest {
            url,
            token,
            body: json!({ "inputs": message }),
            timeout,
        };

        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        tracing::info!(url = %request.url, timeout_ms, "Requesting remote completion");

        // Dropping the transport future on timeout aborts the request.
        let response = match tokio::time::timeout(timeout, self.transport.post_json(&request)).await
        {
            Err(_) | Ok(Err(TransportError::Timeout)) => {
                return Err(RemoteFailure::Timeout { timeout_ms })
            }
            Ok(Err(TransportError::Request(message))) => {
                return Err(RemoteFailure::Transport(message))
            }
            Ok(Ok(response)) => response,
        };

        decode_response(&response)
    }
}

fn decode_response(response: &TransportResponse) -> Result<ResponsePayload, RemoteFailure> {
    if !response.is_success() {
        return Err(RemoteFailure::Http {
            status: response.status,
        });
    }

    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| RemoteFailure::Decode(e.to_string()))?;

    match parse_completion_payload(&body) {
        CompletionPayload::Text(text) => Ok(ResponsePayload {
            text,
            source: ResponseSource::Remote,
            notice: None,
            error: None,
            raw: Some(body),
        }),
        CompletionPayload::Pending(description) => Err(RemoteFailure::Pending(description)),
        CompletionPayload::Error(message) => Err(RemoteFailure::Api(message)),
        CompletionPayload::Unrecognized => Err(RemoteFailure::EmptyText),
    }
}
