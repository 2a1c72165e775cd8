//! Configuration file parser for ~/.config/gazette/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! The API token may come from the file or from the `GAZETTE_API_TOKEN`
//! environment variable; the env var takes precedence.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Env var that overrides `api_token` from the config file.
pub const TOKEN_ENV_VAR: &str = "GAZETTE_API_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified; missing keys fall back to `Default::default()`.
///
/// The custom Debug impl masks `api_token` to keep the credential out of
/// logs, error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream news API endpoint.
    pub base_url: String,

    /// Selectable categories, first entry is the default.
    pub categories: Vec<String>,

    /// Restrict searched results to the last N days (0 = no bound).
    pub search_recency_days: u64,

    /// Upstream API token (alternative to the GAZETTE_API_TOKEN env var;
    /// the env var takes precedence).
    pub api_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.thenewsapi.com/v1/news/all".to_string(),
            categories: [
                "tech",
                "general",
                "science",
                "sports",
                "business",
                "health",
                "entertainment",
                "politics",
                "food",
                "travel",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            search_recency_days: 30,
            api_token: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("categories", &self.categories)
            .field("search_recency_days", &self.search_recency_days)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "base_url",
                "categories",
                "search_recency_days",
                "api_token",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Resolve the upstream token: env var first, then the config file.
    pub fn resolve_token(&self) -> Option<SecretString> {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.trim().is_empty() {
                return Some(SecretString::from(token));
            }
        }
        self.api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| SecretString::from(t.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.base_url.starts_with("https://"));
        assert_eq!(config.categories.first().map(String::as_str), Some("tech"));
        assert_eq!(config.categories.len(), 10);
        assert_eq!(config.search_recency_days, 30);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/gazette_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.search_recency_days, 30);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("gazette_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.categories.len(), 10);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("gazette_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "search_recency_days = 7\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.search_recency_days, 7);
        assert_eq!(config.categories.len(), 10); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("gazette_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
base_url = "http://127.0.0.1:9999/news"
categories = ["tech", "science"]
search_recency_days = 0
api_token = "test-token-123"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9999/news");
        assert_eq!(config.categories, vec!["tech", "science"]);
        assert_eq!(config.search_recency_days, 0);
        assert_eq!(config.api_token.as_deref(), Some("test-token-123"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("gazette_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("gazette_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = "a".repeat(1_048_577);
        std::fs::write(&path, content).unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::TooLarge(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_debug_masks_api_token() {
        let config = Config {
            api_token: Some("super-secret-token-12345".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(
            !debug_output.contains("super-secret-token-12345"),
            "Debug output should not contain the API token"
        );
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn test_resolve_token_empty_is_none() {
        let config = Config {
            api_token: Some("   ".to_string()),
            ..Config::default()
        };
        // Blank token in the file counts as absent. The env var may be set
        // in the test runner's environment, so only assert the file path.
        if std::env::var(TOKEN_ENV_VAR).is_err() {
            assert!(config.resolve_token().is_none());
        }
    }
}
