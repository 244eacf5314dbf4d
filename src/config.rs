//! Client configuration.
//!
//! Settings are layered, lowest to highest precedence:
//! defaults, the optional JSON file at `<config_dir>/marketlens/config.json`,
//! environment variables, then whatever the caller applies with the
//! `with_*` builders (the CLI flags).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default research backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Primary environment variable for the backend URL.
pub const ENV_BACKEND_URL: &str = "MARKETLENS_BACKEND_URL";

/// Fallback environment variable for the backend URL.
pub const ENV_BACKEND_URL_FALLBACK: &str = "BACKEND_URL";

/// Environment variable for the connect timeout, in whole seconds.
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "MARKETLENS_CONNECT_TIMEOUT_SECS";

const CONFIG_DIR_NAME: &str = "marketlens";
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors raised while assembling a [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("failed to read config file {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to parse config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// Settings for talking to the research backend.
///
/// # Example
///
/// ```ignore
/// use marketlens::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://research.example.com/")?
///     .with_connect_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url, "https://research.example.com");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash
    pub base_url: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Overall request timeout. `None` by default since research streams run for minutes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: None,
        }
    }
}

/// On-disk shape of the config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    base_url: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL, validating it.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(url)?;
        Ok(self)
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the overall request timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Defaults, then the user config file if it exists, then environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match default_config_path() {
            Some(path) if path.exists() => Self::default().apply_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env()
    }

    /// Overlay values from a JSON config file.
    pub fn apply_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let file: FileConfig = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(url) = file.base_url {
            self = self.with_base_url(&url)?;
        }
        if let Some(secs) = file.connect_timeout_secs {
            self.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(self)
    }

    /// Overlay values from the environment.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        let url = env_non_empty(ENV_BACKEND_URL).or_else(|| env_non_empty(ENV_BACKEND_URL_FALLBACK));
        if let Some(url) = url {
            self = self.with_base_url(&url)?;
        }

        if let Some(raw) = env_non_empty(ENV_CONNECT_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_CONNECT_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
            self.connect_timeout = Duration::from_secs(secs);
        }

        Ok(self)
    }

    /// URL of the streaming research endpoint.
    pub fn research_url(&self) -> String {
        format!("{}/research", self.base_url)
    }

    /// URL of the health endpoint.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

/// Location of the user config file, if a config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Validate a base URL and strip trailing slashes.
pub fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim();
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| invalid("scheme must be http or https"))?;

    if rest.trim_end_matches('/').is_empty() {
        return Err(invalid("missing host"));
    }
    if rest.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
