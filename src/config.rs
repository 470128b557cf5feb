//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\lead-minder\config.toml
//! - macOS: ~/Library/Application Support/lead-minder/config.toml
//! - Linux: ~/.config/lead-minder/config.toml
//!
//! The config file is human-readable and editable. A missing or unparsable
//! file falls back to defaults; provider keys that are absent or empty mean
//! "not configured" and the session simply never routes to that provider.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::providers::Provider;

/// Enrichment configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Session tuning
    pub session: SessionConfig,
}

/// API credentials, one optional key per known provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Hunter.io API key
    pub hunter_api_key: Option<String>,

    /// Anymail Finder API key
    pub anymail_api_key: Option<String>,

    /// Apollo.io API key
    pub apollo_api_key: Option<String>,
}

impl Credentials {
    /// The configured key for a provider, if any.
    pub fn key_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Hunter => self.hunter_api_key.as_deref(),
            Provider::Anymail => self.anymail_api_key.as_deref(),
            Provider::Apollo => self.apollo_api_key.as_deref(),
        }
    }
}

/// Session tuning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Rate-limit cooldown in milliseconds
    pub rate_limit_cooldown_ms: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rate_limit_cooldown_ms: crate::session::DEFAULT_COOLDOWN_MS,
        }
    }
}

impl SessionConfig {
    /// The cooldown as a duration.
    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.rate_limit_cooldown_ms)
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lead-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path (testable form of [`load`]).
pub fn load_from(path: &std::path::Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &dir)
}

/// Save configuration into an explicit directory (testable form of [`save`]).
pub fn save_to(config: &Config, dir: &std::path::Path) -> Result<(), ConfigError> {
    let path = dir.join("config.toml");

    // Ensure directory exists
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[session]"));
        assert!(toml.contains("rate_limit_cooldown_ms = 60000"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.credentials.hunter_api_key = Some("test-key-123".to_string());
        config.session.rate_limit_cooldown_ms = 5_000;

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(
            parsed.credentials.hunter_api_key,
            Some("test-key-123".to_string())
        );
        assert_eq!(parsed.session.rate_limit_cooldown_ms, 5_000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[credentials]
apollo_api_key = "my-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified field is set
        assert_eq!(config.credentials.apollo_api_key, Some("my-key".to_string()));

        // Other fields use defaults
        assert_eq!(config.credentials.hunter_api_key, None);
        assert_eq!(config.session.rate_limit_cooldown_ms, 60_000);
    }

    #[test]
    fn test_key_for_maps_providers() {
        let creds = Credentials {
            hunter_api_key: Some("h".to_string()),
            anymail_api_key: None,
            apollo_api_key: Some("a".to_string()),
        };
        assert_eq!(creds.key_for(Provider::Hunter), Some("h"));
        assert_eq!(creds.key_for(Provider::Anymail), None);
        assert_eq!(creds.key_for(Provider::Apollo), Some("a"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.credentials.anymail_api_key = Some("roundtrip".to_string());

        save_to(&config, dir.path()).unwrap();
        let loaded = load_from(&dir.path().join("config.toml"));
        assert_eq!(
            loaded.credentials.anymail_api_key,
            Some("roundtrip".to_string())
        );
    }

    #[test]
    fn test_load_missing_or_bad_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_from(&dir.path().join("nope.toml"));
        assert_eq!(missing.credentials.hunter_api_key, None);

        let bad = dir.path().join("config.toml");
        std::fs::write(&bad, "this is not toml [[[").unwrap();
        let loaded = load_from(&bad);
        assert_eq!(loaded.session.rate_limit_cooldown_ms, 60_000);
    }
}
