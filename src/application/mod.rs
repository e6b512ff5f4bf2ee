//! Application layer - use cases and orchestration.
//!
//! This layer contains the reply engines, the dispatcher that chooses
//! between them, and transcript formatting.

pub mod creative;
pub mod dispatcher;
pub mod evaluator;
pub mod formatter;
pub mod keywords;
pub mod parser;
pub mod ports;
pub mod sentiment;
pub mod session;

pub use creative::creative_response;
pub use dispatcher::{completion_url, Dispatcher, CHAT_UNAVAILABLE_REPLY, REMOTE_FALLBACK_NOTICE};
pub use evaluator::{evaluate, evaluate_prompt, format_value, math_response, sanitize};
pub use formatter::{
    format_reply, format_settings_table, format_transcript, format_transcript_markdown,
    format_transcript_text, OutputFormat,
};
pub use keywords::{chat_response, KeywordRule, KeywordSpec, KeywordTable, NO_MATCH_REPLY};
pub use parser::{parse_completion_payload, CompletionPayload};
pub use ports::{
    CompletionRequest, CompletionTransport, ConfigProvider, TransportError, TransportResponse,
};
pub use sentiment::{classify_sentiment, Sentiment};
pub use session::ChatSession;
