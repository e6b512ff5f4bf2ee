//! Domain-level error types for the assistant.
//!
//! All errors are typed with `thiserror`. Arithmetic and remote failures have
//! their own enums because they are never surfaced as `Err` to the caller:
//! they are folded into replies.

use thiserror::Error;

/// Application-level errors raised by configuration, I/O and the CLI.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP client could not be built or a request failed outright.
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// JSON parsing or serialization failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// User input rejected before it reached a model.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl AppError {
    /// Create an HTTP error from a reqwest error.
    pub fn http(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Classified arithmetic failure. `Display` is the advisory shown to users.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Input contains letters or `=`.
    #[error("Math Spark currently handles only numeric arithmetic. Please enter numbers and operators only.")]
    NotArithmetic,

    /// A divisor evaluated to exactly zero.
    #[error("Error: Division by zero")]
    DivisionByZero,

    /// Malformed syntax or a non-finite result.
    #[error("Error: Invalid expression")]
    InvalidExpression,
}

/// Why a remote completion did not produce a reply.
///
/// Only ever attached to a payload as a diagnostic; the user-facing reply
/// always comes from the local fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// No access token configured; the network is never touched.
    #[error("remote completion unavailable: no access token configured")]
    Unavailable,

    /// The request did not finish within the configured timeout.
    #[error("remote completion timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Non-2xx HTTP status.
    #[error("API returned status {status}")]
    Http { status: u16 },

    /// Connection or protocol failure below HTTP.
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body was not JSON.
    #[error("response body was not valid JSON: {0}")]
    Decode(String),

    /// The model is still loading or queued.
    #[error("model pending: {0}")]
    Pending(String),

    /// The payload carried an explicit `error` field.
    #[error("{0}")]
    Api(String),

    /// Nothing usable could be extracted from the payload.
    #[error("unable to extract text from the completion response")]
    EmptyText,
}
