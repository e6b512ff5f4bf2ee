//! Configuration file management and the runtime configuration provider.
//!
//! Settings come from environment variables first, then the TOML file,
//! then built-in defaults. Both sources are consulted on every lookup so a
//! changed file or environment takes effect on the next request.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use crate::application::{ConfigProvider, KeywordTable};
use crate::domain::settings::DEFAULT_TIMEOUT_MS;
use crate::domain::{AppConfig, AppError, RemoteConfig, Result};

pub const ENV_TOKEN: &str = "HUGGINGFACE_TOKEN";
pub const ENV_MODEL: &str = "HUGGINGFACE_MODEL";
pub const ENV_BASE_URL: &str = "HUGGINGFACE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "HUGGINGFACE_TIMEOUT_MS";

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# iXiA assistant configuration
# Auto-generated - edit as needed

[remote]
# Inference endpoint; the model name is appended as a path
base_url = "https://api-inference.huggingface.co/models"

# Model used for chat completions
model = "tiiuae/falcon-7b-instruct"

# Request timeout in milliseconds (default: 20000)
timeout_ms = 20000

# Access token (prefer the HUGGINGFACE_TOKEN environment variable)
# token = "hf_..."

[chat]
# Longest accepted message
max_message_chars = 4000

# Pause before each reply, in milliseconds
typing_delay_ms = 0

# Model used when none is given: chat, math or creative
default_model = "chat"
"#;

/// Load configuration from the default path, or defaults if absent.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    load_config_or_default(&AppConfig::default_config_path())
}

/// Load configuration from `path`, or defaults if the file is absent.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        load_config_from_file(path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Write the commented default configuration if no file exists yet.
///
/// Returns `true` when a file was created.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %path.display(), "Created default configuration");

    Ok(true)
}

/// Load a keyword reply table from a JSON file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_keyword_table(path: &Path) -> Result<KeywordTable> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read keyword table: {}", path.display()), e))?;

    serde_json::from_str(&content).map_err(AppError::json_parse)
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration provider backed by the environment and an optional file.
pub struct RuntimeConfig {
    path: Option<PathBuf>,
    snapshot: RwLock<RemoteConfig>,
    env: EnvLookup,
}

impl RuntimeConfig {
    /// Provider over the process environment and the given file settings.
    #[must_use]
    pub fn new(remote: RemoteConfig, path: Option<PathBuf>) -> Self {
        Self::with_env(remote, path, |key| std::env::var(key).ok())
    }

    /// Provider with a custom environment lookup.
    #[must_use]
    pub fn with_env(
        remote: RemoteConfig,
        path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            path,
            snapshot: RwLock::new(remote),
            env: Box::new(env),
        }
    }

    /// Non-blank, trimmed environment value.
    fn env_value(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Current file settings. Keeps the last good copy if the file is
    /// missing or broken.
    fn remote(&self) -> RemoteConfig {
        if let Some(path) = self.path.as_deref().filter(|p| p.exists()) {
            match load_config_from_file(path) {
                Ok(config) => {
                    if let Ok(mut guard) = self.snapshot.write() {
                        guard.clone_from(&config.remote);
                    }
                    return config.remote;
                }
                Err(e) => tracing::debug!(error = %e, "Using cached remote settings"),
            }
        }

        self.snapshot
            .read()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |guard| guard.clone())
    }
}

impl ConfigProvider for RuntimeConfig {
    fn access_token(&self) -> Option<String> {
        self.env_value(ENV_TOKEN).or_else(|| {
            self.remote()
                .token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        })
    }

    fn base_url(&self) -> String {
        self.env_value(ENV_BASE_URL)
            .unwrap_or_else(|| self.remote().base_url)
    }

    fn timeout(&self) -> Duration {
        // Values too large for a Duration count as invalid.
        let from_env = self
            .env_value(ENV_TIMEOUT_MS)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .and_then(|ms| Duration::try_from_secs_f64(ms / 1000.0).ok());

        from_env.unwrap_or_else(|| match self.remote().timeout_ms {
            0 => Duration::from_millis(DEFAULT_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        })
    }

    fn chat_model_name(&self) -> String {
        self.env_value(ENV_MODEL)
            .unwrap_or_else(|| self.remote().model)
    }
}

/// Fixed configuration, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticConfig {
    pub token: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub model: String,
}

impl ConfigProvider for StaticConfig {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn chat_model_name(&self) -> String {
        self.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn provider(remote: RemoteConfig, vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RuntimeConfig::with_env(remote, None, move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config_parses() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.remote.timeout_ms, 20_000);
        assert_eq!(config.chat.max_message_chars, 4000);
        assert!(config.remote.token.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let remote = RemoteConfig {
            token: Some("file-token".into()),
            ..RemoteConfig::default()
        };
        let config = provider(
            remote,
            &[
                (ENV_TOKEN, " env-token "),
                (ENV_MODEL, "gpt2"),
                (ENV_BASE_URL, "http://localhost:8080"),
                (ENV_TIMEOUT_MS, "1500"),
            ],
        );

        assert_eq!(config.access_token().as_deref(), Some("env-token"));
        assert_eq!(config.chat_model_name(), "gpt2");
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_defaults_without_env_or_token() {
        let config = provider(RemoteConfig::default(), &[(ENV_TOKEN, "   ")]);

        assert_eq!(config.access_token(), None);
        assert_eq!(config.chat_model_name(), "tiiuae/falcon-7b-instruct");
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_invalid_timeout_uses_default() {
        for raw in ["abc", "-5", "0", "1e300", "inf", "NaN"] {
            let config = provider(RemoteConfig::default(), &[(ENV_TIMEOUT_MS, raw)]);
            assert_eq!(config.timeout(), Duration::from_millis(20_000), "{raw}");
        }

        let zero_in_file = RemoteConfig {
            timeout_ms: 0,
            ..RemoteConfig::default()
        };
        assert_eq!(
            provider(zero_in_file, &[]).timeout(),
            Duration::from_millis(20_000)
        );
    }

    #[test]
    fn test_file_changes_are_picked_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[remote]\nmodel = \"first\"\n").unwrap();

        let config = RuntimeConfig::with_env(RemoteConfig::default(), Some(path.clone()), |_| None);
        assert_eq!(config.chat_model_name(), "first");

        fs::write(&path, "[remote]\nmodel = \"second\"\n").unwrap();
        assert_eq!(config.chat_model_name(), "second");

        fs::write(&path, "not = [valid").unwrap();
        assert_eq!(config.chat_model_name(), "second");
    }

    #[test]
    fn test_ensure_config_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(ensure_config_exists(&path).unwrap());
        assert!(!ensure_config_exists(&path).unwrap());

        let loaded = load_config_from_file(&path).unwrap();
        assert_eq!(loaded.chat.default_model, "chat");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.remote.timeout_ms, 20_000);
    }

    #[test]
    fn test_load_keyword_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        fs::write(
            &path,
            r#"{"rules": [{"keywords": ["ping"], "replies": ["pong"]}]}"#,
        )
        .unwrap();

        let table = load_keyword_table(&path).unwrap();
        assert_eq!(table.rules.len(), 1);

        fs::write(&path, "{").unwrap();
        assert!(matches!(
            load_keyword_table(&path),
            Err(AppError::JsonParse { .. })
        ));
    }
}
