//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::AppSettings;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where session tokens and downloads live
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_file")]
    pub token_file: String,

    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: String,
}

fn default_token_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("sales-predictor").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("./session.json"))
        .to_string_lossy()
        .to_string()
}

fn default_downloads_dir() -> String {
    dirs::download_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
            downloads_dir: default_downloads_dir(),
        }
    }
}

/// Google sign-in
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// OAuth client id; the sign-in button only appears when set
    #[serde(default)]
    pub google_client_id: Option<String>,
}

/// Page transition and notification timing
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_transition_cooldown")]
    pub transition_cooldown_ms: u64,

    #[serde(default = "default_toast_duration")]
    pub toast_duration_ms: u64,
}

fn default_transition_cooldown() -> u64 {
    600
}

fn default_toast_duration() -> u64 {
    3500
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            transition_cooldown_ms: default_transition_cooldown(),
            toast_duration_ms: default_toast_duration(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config.expand_paths())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("sales-predictor").join("config.toml")),
            Some(PathBuf::from("/etc/sales-predictor/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Resolve a leading `~` in path settings against the home directory
    fn expand_paths(mut self) -> Self {
        self.session.token_file = expand_home(&self.session.token_file);
        self.session.downloads_dir = expand_home(&self.session.downloads_dir);
        self.logging.file = self.logging.file.as_deref().map(expand_home);
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PREDICTOR_API_URL") {
            self.api.base_url = url;
        }
        if let Some(path) = lookup("PREDICTOR_TOKEN_FILE") {
            self.session.token_file = expand_home(&path);
        }
        if let Some(client_id) = lookup("PREDICTOR_GOOGLE_CLIENT_ID") {
            self.auth.google_client_id = Some(client_id).filter(|id| !id.is_empty());
        }
        if let Some(level) = lookup("PREDICTOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("PREDICTOR_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Settings for the application context
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            google_client_id: self.auth.google_client_id.clone(),
            downloads_dir: PathBuf::from(&self.session.downloads_dir),
            transition_cooldown: Duration::from_millis(self.ui.transition_cooldown_ms),
            toast_duration: Duration::from_millis(self.ui.toast_duration_ms),
        }
    }
}

fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return path.to_string(),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home.to_string_lossy().to_string(),
        Some(home) => home.join(rest).to_string_lossy().to_string(),
        None => path.to_string(),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Sales Predictor Configuration
#
# Environment variables override these settings:
# - PREDICTOR_API_URL
# - PREDICTOR_TOKEN_FILE
# - PREDICTOR_GOOGLE_CLIENT_ID
# - PREDICTOR_LOG_LEVEL
# - PREDICTOR_LOG_FORMAT

[api]
# Backend base URL
base_url = "http://127.0.0.1:8000"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Where the access/refresh token pair is kept
# (default: <local data dir>/sales-predictor/session.json)
# token_file = "~/.local/share/sales-predictor/session.json"

# Where downloaded results are written (default: the user's download dir)
# downloads_dir = "~/Downloads"

[auth]
# Google OAuth client id; leave unset to hide Google sign-in
# google_client_id = "1234.apps.googleusercontent.com"

[ui]
# Scroll suppression after a page transition (ms)
transition_cooldown_ms = 600

# How long notifications stay visible (ms)
toast_duration_ms = 3500

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/sales-predictor/client.log"
"#
    .to_string()
}
