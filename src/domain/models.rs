//! Domain models for chat requests and replies.
//!
//! Everything here is transient: produced for one request/response cycle and
//! handed to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::MathError;

/// Which reply engine handles a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSelector {
    /// Remote completion first, keyword matcher as fallback.
    #[default]
    Chat,
    /// Arithmetic evaluator only.
    Math,
    /// Random creative prompt kits.
    Creative,
}

impl ModelSelector {
    /// Resolve a free-form tag. Unrecognized tags select `Chat`.
    #[must_use]
    pub fn resolve(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "math" => Self::Math,
            "creative" | "other" | "creative/other" => Self::Creative,
            _ => Self::Chat,
        }
    }

    /// Tag as shown to users.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Math => "math",
            Self::Creative => "creative",
        }
    }
}

impl std::fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a message as arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvalOutcome {
    /// A finite numeric result.
    Value(f64),
    /// The message was not meant as math; route it elsewhere.
    NoSignal,
    /// The message looked like math but could not be evaluated.
    Failed(MathError),
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseSource {
    /// Hosted completion endpoint.
    Remote,
    /// Local rule engine after a remote failure.
    LocalFallback,
    /// Last-resort fixed string.
    Static,
}

/// Structured reply, used whenever there is more to say than the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// The user-visible reply.
    pub text: String,
    /// Which engine produced `text`.
    pub source: ResponseSource,
    /// Optional side-channel message for the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    /// Diagnostic reason for a fallback. Never the primary reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw remote payload on a remote success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// What the dispatcher hands back: plain text unless a notice must travel
/// with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Payload(ResponsePayload),
}

impl Reply {
    /// The user-visible reply text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Payload(payload) => &payload.text,
        }
    }

    /// Fallback notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Payload(payload) => payload.notice.as_deref(),
        }
    }

    /// Source of the reply, when the dispatcher recorded one.
    #[must_use]
    pub const fn source(&self) -> Option<ResponseSource> {
        match self {
            Self::Text(_) => None,
            Self::Payload(payload) => Some(payload.source),
        }
    }
}

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Speaker label used in plain-text exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "AI",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Model that answered (assistant messages only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSelector>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            model: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>, model: ModelSelector) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            model: Some(model),
            timestamp: Utc::now(),
        }
    }
}

/// Maximum characters of the first user message used as a title.
const TITLE_CHARS: usize = 40;

/// An in-memory chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Title derived from the first user message, or the creation date.
    #[must_use]
    pub fn title(&self) -> String {
        let first = self
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .map_or("", |m| m.text.as_str());
        generate_title(first, self.created_at)
    }

    /// File name used when exporting, without extension.
    #[must_use]
    pub fn export_stem(&self) -> String {
        let title = self.title();
        let stem: String = title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        format!("{stem}_export")
    }
}

/// Build a chat title from free text.
///
/// Whitespace runs collapse to one space; long text is cut at 40 characters
/// and marked with an ellipsis.
#[must_use]
pub fn generate_title(text: &str, created_at: DateTime<Utc>) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return format!("Chat on {}", created_at.format("%Y-%m-%d"));
    }

    if normalized.chars().count() > TITLE_CHARS {
        let snippet: String = normalized.chars().take(TITLE_CHARS).collect();
        format!("{}…", snippet.trim_end())
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_model_selector_resolve() {
        assert_eq!(ModelSelector::resolve("MATH"), ModelSelector::Math);
        assert_eq!(ModelSelector::resolve("Creative"), ModelSelector::Creative);
        assert_eq!(ModelSelector::resolve("other"), ModelSelector::Creative);
        assert_eq!(
            ModelSelector::resolve("creative/other"),
            ModelSelector::Creative
        );
        assert_eq!(ModelSelector::resolve("chat"), ModelSelector::Chat);
        assert_eq!(ModelSelector::resolve("gpt-9000"), ModelSelector::Chat);
        assert_eq!(ModelSelector::resolve(""), ModelSelector::Chat);
    }

    #[test]
    fn test_response_source_serializes_kebab_case() {
        let payload = ResponsePayload {
            text: "hi".into(),
            source: ResponseSource::LocalFallback,
            notice: None,
            error: None,
            raw: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["source"], "local-fallback");
        assert!(json.get("notice").is_none());
    }

    #[test]
    fn test_reply_text_for_both_shapes() {
        let plain = Reply::Text("hello".into());
        assert_eq!(plain.text(), "hello");
        assert!(plain.notice().is_none());

        let structured = Reply::Payload(ResponsePayload {
            text: "local".into(),
            source: ResponseSource::LocalFallback,
            notice: Some("offline".into()),
            error: None,
            raw: None,
        });
        assert_eq!(structured.text(), "local");
        assert_eq!(structured.notice(), Some("offline"));
        assert_eq!(structured.source(), Some(ResponseSource::LocalFallback));
    }

    #[test]
    fn test_generate_title() {
        let date = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        assert_eq!(generate_title("  hello   there ", date), "hello there");
        assert_eq!(generate_title("", date), "Chat on 2025-03-14");

        let long = "a".repeat(39) + " and then some more words";
        let title = generate_title(&long, date);
        assert!(title.ends_with('…'));
        assert_eq!(title.chars().count(), 40);
    }

    #[test]
    fn test_transcript_title_uses_first_user_message() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::assistant("Welcome!", ModelSelector::Chat));
        transcript.push(ChatMessage::user("What's 5 + 3?"));
        assert_eq!(transcript.title(), "What's 5 + 3?");
        assert_eq!(transcript.export_stem(), "What's_5_+_3?_export");
    }
}
