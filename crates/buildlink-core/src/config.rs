//! Configuration loading.
//!
//! Values are resolved in three layers: built-in defaults, an optional TOML
//! file, then environment variables.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::http::BasicAuth;

/// Default upstream endpoints and service settings.
pub mod defaults {
    pub const BMS_BASE_URL: &str = "https://bms-api.build.aau.dk/api/v1";
    pub const DOOR_BASE_URL: &str = "http://iot.multiteknik.dk:8080";
    pub const DOOR_DEVICE_ID: &str = "47afeb80-276e-11ec-92de-537d4a380471";
    pub const HTTP_TIMEOUT_SECS: u64 = 30;
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8080;
}

/// Environment variable names.
pub mod env_vars {
    pub const CONFIG: &str = "BUILDLINK_CONFIG";
    pub const LOG_JSON: &str = "BUILDLINK_LOG_JSON";

    pub const BMS_USERNAME: &str = "BMS_USERNAME";
    pub const BMS_PASSWORD: &str = "BMS_PASSWORD";
    pub const BMS_BASE_URL: &str = "BMS_BASE_URL";

    pub const DOOR_USERNAME: &str = "DOOR_USERNAME";
    pub const DOOR_PASSWORD: &str = "DOOR_PASSWORD";
    pub const DOOR_BASE_URL: &str = "DOOR_BASE_URL";
    pub const DOOR_DEVICE_ID: &str = "DOOR_DEVICE_ID";

    pub const HTTP_TIMEOUT_SECS: &str = "BUILDLINK_HTTP_TIMEOUT_SECS";
    pub const HOST: &str = "BUILDLINK_HOST";
    pub const PORT: &str = "BUILDLINK_PORT";
}

/// Strip trailing slashes so paths can be appended with `format!("{}/x", base)`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Building-management-system API settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BmsConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Default for BmsConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BMS_BASE_URL.to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl BmsConfig {
    pub fn credentials(&self) -> BasicAuth {
        BasicAuth::new(&self.username, &self.password)
    }
}

impl fmt::Debug for BmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BmsConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Door-counter telemetry API settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DoorCounterConfig {
    pub base_url: String,
    pub device_id: String,
    pub username: String,
    pub password: String,
}

impl Default for DoorCounterConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DOOR_BASE_URL.to_string(),
            device_id: defaults::DOOR_DEVICE_ID.to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl fmt::Debug for DoorCounterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoorCounterConfig")
            .field("base_url", &self.base_url)
            .field("device_id", &self.device_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub bms: BmsConfig,
    pub door_counters: DoorCounterConfig,
    pub http: HttpConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load defaults, then the optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML content; missing sections and keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(env_vars::BMS_USERNAME) {
            self.bms.username = v;
        }
        if let Some(v) = lookup(env_vars::BMS_PASSWORD) {
            self.bms.password = v;
        }
        if let Some(v) = lookup(env_vars::BMS_BASE_URL) {
            self.bms.base_url = v;
        }
        if let Some(v) = lookup(env_vars::DOOR_USERNAME) {
            self.door_counters.username = v;
        }
        if let Some(v) = lookup(env_vars::DOOR_PASSWORD) {
            self.door_counters.password = v;
        }
        if let Some(v) = lookup(env_vars::DOOR_BASE_URL) {
            self.door_counters.base_url = v;
        }
        if let Some(v) = lookup(env_vars::DOOR_DEVICE_ID) {
            self.door_counters.device_id = v;
        }
        if let Some(v) = lookup(env_vars::HTTP_TIMEOUT_SECS) {
            self.http.timeout_secs = v.parse().map_err(|_| {
                Error::Config(format!("{} must be an integer, got '{}'", env_vars::HTTP_TIMEOUT_SECS, v))
            })?;
        }
        if let Some(v) = lookup(env_vars::HOST) {
            self.server.host = v;
        }
        if let Some(v) = lookup(env_vars::PORT) {
            self.server.port = v.parse().map_err(|_| {
                Error::Config(format!("{} must be a port number, got '{}'", env_vars::PORT, v))
            })?;
        }
        self.normalize();
        Ok(())
    }

    fn normalize(&mut self) {
        self.bms.base_url = normalize_base_url(&self.bms.base_url);
        self.door_counters.base_url = normalize_base_url(&self.door_counters.base_url);
    }
}
