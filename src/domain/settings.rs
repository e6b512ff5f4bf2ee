//! Configuration models.
//!
//! Contains the file-backed settings for the remote completion service and
//! the chat front end.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_CHAT_MODEL: &str = "tiiuae/falcon-7b-instruct";
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Settings for the hosted completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL the model name is joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for chat completions.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Access token. Prefer the `HUGGINGFACE_TOKEN` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
            token: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Settings for the chat front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Messages longer than this are rejected.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Pause before answering, in milliseconds.
    #[serde(default)]
    pub typing_delay_ms: u64,

    /// Model used when none is given on the command line.
    #[serde(default = "default_chat_model_tag")]
    pub default_model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: default_max_message_chars(),
            typing_delay_ms: 0,
            default_model: default_chat_model_tag(),
        }
    }
}

const fn default_max_message_chars() -> usize {
    4000
}

fn default_chat_model_tag() -> String {
    "chat".to_string()
}

impl ChatConfig {
    #[must_use]
    pub const fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ixia")
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.remote.timeout_ms, 20_000);
        assert_eq!(config.remote.model, "tiiuae/falcon-7b-instruct");
        assert!(config.remote.token.is_none());
        assert_eq!(config.chat.max_message_chars, 4000);
        assert_eq!(config.chat.typing_delay(), Duration::ZERO);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = toml::from_str("[remote]\nmodel = \"gpt2\"\n").unwrap();
        assert_eq!(config.remote.model, "gpt2");
        assert_eq!(config.remote.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.chat.default_model, "chat");
    }

    #[test]
    fn test_default_config_path_is_under_data_dir() {
        let path = AppConfig::default_config_path();
        assert!(path.ends_with(".ixia/config.toml"));
    }
}
