//! JSON decoding for completion responses.
//!
//! Hosted inference endpoints answer in several shapes: bare strings,
//! arrays of `{generated_text}`, chat-style `choices`, or status objects while
//! a model warms up. All of that shape sniffing happens here, once.

use serde_json::Value;

/// Fallback description for a pending payload without a status text.
const PENDING_DEFAULT: &str = "model is pending";

/// A completion response classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionPayload {
    /// The model is still loading or queued.
    Pending(String),
    /// The payload carried an explicit `error` field.
    Error(String),
    /// Generated text, never empty.
    Text(String),
    /// Nothing recognizable.
    Unrecognized,
}

/// Classify a decoded completion response.
#[must_use]
pub fn parse_completion_payload(payload: &Value) -> CompletionPayload {
    if is_pending(payload) {
        return CompletionPayload::Pending(describe_pending(payload));
    }

    if let Some(error) = payload.get("error").filter(|e| is_truthy(e)) {
        let message = error
            .as_str()
            .map_or_else(|| "Unknown API error".to_string(), str::to_string);
        return CompletionPayload::Error(message);
    }

    match extract_text(payload) {
        Some(text) => CompletionPayload::Text(text.to_string()),
        None => CompletionPayload::Unrecognized,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn mentions_pending(text: &str) -> bool {
    let normalized = text.to_lowercase();
    normalized.contains("loading") || normalized.contains("queue")
}

/// Whether the payload says the model is not ready yet.
#[must_use]
pub fn is_pending(payload: &Value) -> bool {
    match payload {
        Value::String(text) => mentions_pending(text),
        Value::Array(entries) => entries.iter().any(is_pending),
        Value::Object(map) => {
            if map.get("estimated_time").is_some_and(Value::is_number) {
                return true;
            }
            if map.get("is_generating") == Some(&Value::Bool(true)) {
                return true;
            }

            let status = map
                .get("status")
                .and_then(Value::as_str)
                .map(str::to_lowercase)
                .unwrap_or_default();
            if status == "queued" || status == "loading" {
                return true;
            }

            let direct = ["message", "error"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str));
            let nested = map
                .get("messages")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(|entry| {
                    entry
                        .as_str()
                        .or_else(|| entry.get("message").and_then(Value::as_str))
                });

            direct.chain(nested).any(mentions_pending)
        }
        _ => false,
    }
}

/// Short human description of a pending payload.
#[must_use]
pub fn describe_pending(payload: &Value) -> String {
    match payload {
        Value::String(text) => text.clone(),
        Value::Array(entries) => entries
            .iter()
            .map(describe_pending)
            .find(|d| !d.is_empty())
            .unwrap_or_else(|| PENDING_DEFAULT.to_string()),
        Value::Object(map) => ["status", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map_or_else(|| PENDING_DEFAULT.to_string(), str::to_string),
        _ => PENDING_DEFAULT.to_string(),
    }
}

/// First non-empty text found in the payload.
///
/// Objects are searched in order: `generated_text`, `response`, `choices`,
/// `data`, `message`. A present string field wins even when empty.
#[must_use]
pub fn extract_text(payload: &Value) -> Option<&str> {
    let found = match payload {
        Value::String(text) => Some(text.as_str()),
        Value::Array(entries) => entries.iter().find_map(extract_text),
        Value::Object(map) => {
            if let Some(text) = map.get("generated_text").and_then(Value::as_str) {
                Some(text)
            } else if let Some(text) = map.get("response").and_then(Value::as_str) {
                Some(text)
            } else {
                ["choices", "data"]
                    .iter()
                    .filter_map(|key| map.get(*key).and_then(Value::as_array))
                    .find_map(|entries| entries.iter().find_map(extract_text))
                    .or_else(|| map.get("message").and_then(Value::as_str))
            }
        }
        _ => None,
    };

    found.filter(|text| !text.is_empty())
}
