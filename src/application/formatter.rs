//! Output formatting for transcripts and settings.
//!
//! Supports multiple output formats: plain text, Markdown, and JSON.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{Reply, Role, Transcript};

use super::ports::ConfigProvider;
use super::sentiment::classify_sentiment;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one block per message.
    #[default]
    Text,
    /// Human-readable Markdown format.
    Markdown,
    /// JSON format for programmatic use.
    Json,
}

impl OutputFormat {
    /// File extension used for exports.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use: text, markdown, json")),
        }
    }
}

/// Formats a transcript in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn format_transcript(
    transcript: &Transcript,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(format_transcript_text(transcript)),
        OutputFormat::Markdown => Ok(format_transcript_markdown(transcript)),
        OutputFormat::Json => serde_json::to_string_pretty(transcript),
    }
}

/// Formats a transcript as plain text: the title, then `User:`/`AI:` blocks.
#[must_use]
pub fn format_transcript_text(transcript: &Transcript) -> String {
    let mut out = format!("{}\n\n", transcript.title());
    for message in &transcript.messages {
        out.push_str(&format!("{}: {}\n\n", message.role, message.text));
    }
    out
}

/// Formats a transcript as Markdown.
#[must_use]
pub fn format_transcript_markdown(transcript: &Transcript) -> String {
    let mut out = format!("# {}\n\n", transcript.title());
    out.push_str(&format!(
        "**Started:** {}\n",
        transcript.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("**Messages:** {}\n\n", transcript.messages.len()));
    out.push_str("---\n\n");

    for message in &transcript.messages {
        let role = match message.role {
            Role::User => "👤 **User**".to_string(),
            Role::Assistant => match message.model {
                Some(model) => format!("🤖 **Assistant** ({model})"),
                None => "🤖 **Assistant**".to_string(),
            },
        };
        out.push_str(&format!("### {role}\n\n"));
        out.push_str(&format!("*{}*\n\n", message.timestamp.format("%H:%M:%S")));
        out.push_str(&message.text);
        out.push_str("\n\n---\n\n");
    }

    out
}

/// Formats a reply for the terminal, with any fallback notice dimmed below.
#[must_use]
pub fn format_reply(reply: &Reply, show_sentiment: bool) -> String {
    let mut out = format!("{} {}", "iXiA:".cyan().bold(), reply.text());
    if let Some(notice) = reply.notice() {
        out.push_str(&format!("\n{}", notice.dimmed()));
    }
    if show_sentiment {
        out.push_str(&format!(
            "\n{}",
            format!("sentiment: {}", classify_sentiment(reply.text())).dimmed()
        ));
    }
    out
}

/// Formats the resolved remote settings as a table. The token is redacted.
#[must_use]
pub fn format_settings_table(config: &dyn ConfigProvider) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Setting", "Value"]);

    let token = config
        .access_token()
        .map_or_else(|| "(not set)".to_string(), |t| redact(&t));

    table.add_row(vec!["base_url".to_string(), config.base_url()]);
    table.add_row(vec!["model".to_string(), config.chat_model_name()]);
    table.add_row(vec![
        "timeout_ms".to_string(),
        config.timeout().as_millis().to_string(),
    ]);
    table.add_row(vec!["token".to_string(), token]);

    table.to_string()
}

/// Keep the first four characters of a secret.
fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatMessage, ModelSelector};

    fn sample() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("What's 5 + 3?"));
        transcript.push(ChatMessage::assistant(
            "The result of the calculation is: 8",
            ModelSelector::Math,
        ));
        transcript
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_export() {
        let text = format_transcript_text(&sample());
        assert_eq!(
            text,
            "What's 5 + 3?\n\nUser: What's 5 + 3?\n\nAI: The result of the calculation is: 8\n\n"
        );
    }

    #[test]
    fn test_markdown_export_names_model() {
        let md = format_transcript_markdown(&sample());
        assert!(md.starts_with("# What's 5 + 3?"));
        assert!(md.contains("**Messages:** 2"));
        assert!(md.contains("🤖 **Assistant** (math)"));
    }

    #[test]
    fn test_json_export_round_trips() {
        let json = format_transcript(&sample(), OutputFormat::Json).unwrap();
        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back.messages.len(), 2);
        assert_eq!(back.messages[1].model, Some(ModelSelector::Math));
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact("hf_abcdefgh"), "hf_a…");
    }
}
