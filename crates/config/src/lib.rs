//! Configuration loading, validation, and management for Lookout.
//!
//! Loads configuration from `~/.lookout/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use lookout_core::TickPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.lookout/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the device runtime sends images
    #[serde(default)]
    pub relay: RelayConfig,

    /// Object finder (search loop) settings
    #[serde(default)]
    pub finder: FinderConfig,

    /// Camera assistant (single-shot Q&A) settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Relay server settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Speech output settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Frame source settings
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_url")]
    pub base_url: String,

    /// Budget for one find-object round trip
    #[serde(default = "default_find_timeout")]
    pub find_timeout_secs: u64,

    /// Budget for one analyze round trip
    #[serde(default = "default_analyze_timeout")]
    pub analyze_timeout_secs: u64,
}

fn default_relay_url() -> String {
    "http://127.0.0.1:3000".into()
}
fn default_find_timeout() -> u64 {
    10
}
fn default_analyze_timeout() -> u64 {
    20
}

impl RelayConfig {
    pub fn find_timeout(&self) -> Duration {
        Duration::from_secs(self.find_timeout_secs)
    }

    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_secs(self.analyze_timeout_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_relay_url(),
            find_timeout_secs: default_find_timeout(),
            analyze_timeout_secs: default_analyze_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Period between capture cycles
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_finder_quality")]
    pub capture_quality: f32,

    #[serde(default)]
    pub tick_policy: TickPolicy,
}

fn default_interval_ms() -> u64 {
    2000
}
fn default_finder_quality() -> f32 {
    0.5
}

impl FinderConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            capture_quality: default_finder_quality(),
            tick_policy: TickPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_quality")]
    pub capture_quality: f32,
}

fn default_assistant_quality() -> f32 {
    0.7
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            capture_quality: default_assistant_quality(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Largest accepted request body; base64 images are big
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_rate")]
    pub rate: f32,
}

fn default_speech_rate() -> f32 {
    0.9
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: default_speech_rate(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Image file or directory of images to serve as camera frames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.lookout/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `LOOKOUT_RELAY_URL`
    /// - `LOOKOUT_GATEWAY_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(url) = std::env::var("LOOKOUT_RELAY_URL") {
            config.relay.base_url = url;
        }

        if let Ok(port) = std::env::var("LOOKOUT_GATEWAY_PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("LOOKOUT_GATEWAY_PORT is not a port: {port}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".lookout")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.relay.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "relay.base_url must be an http(s) URL, got {url:?}"
            )));
        }

        if self.relay.find_timeout_secs == 0 || self.relay.analyze_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "relay timeouts must be > 0".into(),
            ));
        }

        if self.finder.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "finder.interval_ms must be > 0".into(),
            ));
        }

        for (name, quality) in [
            ("finder.capture_quality", self.finder.capture_quality),
            ("assistant.capture_quality", self.assistant.capture_quality),
        ] {
            if !(0.0..=1.0).contains(&quality) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 1.0"
                )));
            }
        }

        if self.speech.rate <= 0.0 {
            return Err(ConfigError::ValidationError(
                "speech.rate must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.finder.interval_ms, 2000);
        assert_eq!(config.relay.find_timeout(), Duration::from_secs(10));
        assert_eq!(config.relay.analyze_timeout(), Duration::from_secs(20));
        assert_eq!(config.finder.tick_policy, TickPolicy::SkipIfBusy);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.relay.base_url, config.relay.base_url);
        assert_eq!(parsed.gateway.port, config.gateway.port);
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = AppConfig::default();
        config.finder.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_quality_rejected() {
        let mut config = AppConfig::default();
        config.assistant.capture_quality = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("assistant.capture_quality"));
    }

    #[test]
    fn non_http_relay_rejected() {
        let mut config = AppConfig::default();
        config.relay.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.gateway.port, 3000);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[relay]
base_url = "https://relay.example.com"

[finder]
interval_ms = 500
tick_policy = "overlap"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.relay.base_url, "https://relay.example.com");
        assert_eq!(config.relay.find_timeout_secs, 10);
        assert_eq!(config.finder.interval_ms, 500);
        assert_eq!(config.finder.tick_policy, TickPolicy::Overlap);
        assert!((config.speech.rate - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn unparseable_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[finder\ninterval_ms = ").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("skip_if_busy"));
    }
}
