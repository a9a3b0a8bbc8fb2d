//! Client configuration
//!
//! Values come from an optional file (TOML/YAML/JSON, picked by extension)
//! overlaid with `STEAMLITE_*` environment variables. Nested keys use a
//! double underscore, e.g. `STEAMLITE_ANTI_FORGERY__HEADER`.

use crate::error::{CoreError, CoreResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "STEAMLITE";

/// Top-level configuration for the API client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base address; request paths are appended to it
    pub base_url: String,
    /// Upper bound on a single request attempt, in seconds
    pub timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
    pub anti_forgery: AntiForgeryConfig,
    pub storage: StorageConfig,
}

/// Anti-forgery (CSRF) token contract with the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AntiForgeryConfig {
    /// Header carrying the cached token on state-mutating requests
    pub header: String,
    /// Path of the token endpoint, relative to `base_url`
    pub endpoint: String,
    /// Machine-readable `code` the backend uses for a rejected token
    pub error_code: String,
    /// Substring of the error message identifying a rejected token
    pub message_marker: String,
}

/// Where durable credentials live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Session directory; platform data directory when unset
    pub dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8080".to_string(),
            timeout_secs: 10,
            user_agent: format!("steamlite-client/{}", env!("CARGO_PKG_VERSION")),
            anti_forgery: AntiForgeryConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for AntiForgeryConfig {
    fn default() -> Self {
        Self {
            header: "X-CSRF-Token".to_string(),
            endpoint: "/csrf-token".to_string(),
            error_code: "csrf_invalid".to_string(),
            message_marker: "CSRF".to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolve the session directory
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }

        ProjectDirs::from("com", "SteamLite", "steamlite").map_or_else(
            || PathBuf::from("./.steamlite"),
            |dirs| dirs.data_dir().join("session"),
        )
    }
}

impl ClientConfig {
    /// Load configuration from a file, with environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. Values are not
    /// checked here; call [`ClientConfig::validate`] once overrides are applied
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed. Values
    /// are not checked here, as with [`ClientConfig::from_file`]
    pub fn from_env() -> CoreResult<Self> {
        let settings = config::Config::builder().add_source(environment()).build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check the values that cannot be expressed in the type system
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` describing the first bad value
    pub fn validate(&self) -> CoreResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|err| {
            CoreError::invalid_config(format!("base_url '{}': {err}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::invalid_config(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CoreError::invalid_config("timeout_secs must be positive"));
        }
        if self.anti_forgery.header.trim().is_empty() {
            return Err(CoreError::invalid_config("anti_forgery.header is empty"));
        }
        if !self.anti_forgery.endpoint.starts_with('/') {
            return Err(CoreError::invalid_config(
                "anti_forgery.endpoint must start with '/'",
            ));
        }
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
