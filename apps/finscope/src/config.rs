//! # Configuration Module
//!
//! Server configuration loaded from an optional TOML file, then overridden
//! by environment variables.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! body_limit_bytes = 2097152
//! max_ledger_entries = 100000
//!
//! [security]
//! cors_origins = "http://localhost:3000"
//! rate_limit = 100
//! api_key = "change-me"
//! ```
//!
//! ## Environment Overrides
//!
//! - `FINSCOPE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all
//! - `FINSCOPE_RATE_LIMIT`: Requests per second (0 disables rate limiting)
//! - `FINSCOPE_API_KEY`: If set, `/admin/*` requires Bearer token authentication

use finscope_core::FinscopeError;
use finscope_core::primitives::MAX_LEDGER_ENTRIES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum size of a configuration file (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

pub const ENV_CORS_ORIGINS: &str = "FINSCOPE_CORS_ORIGINS";
pub const ENV_RATE_LIMIT: &str = "FINSCOPE_RATE_LIMIT";
pub const ENV_API_KEY: &str = "FINSCOPE_API_KEY";

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinscopeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Cap on stored submissions, and separately on stored reviews.
    #[serde(default = "default_max_ledger_entries")]
    pub max_ledger_entries: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
            max_ledger_entries: default_max_ledger_entries(),
        }
    }
}

/// `[security]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// `None` means localhost only.
    #[serde(default)]
    pub cors_origins: Option<String>,
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: None,
            rate_limit: default_rate_limit(),
            api_key: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    2 * 1024 * 1024
}

fn default_max_ledger_entries() -> usize {
    MAX_LEDGER_ENTRIES
}

fn default_rate_limit() -> u32 {
    100
}

// =============================================================================
// LOADING
// =============================================================================

impl FinscopeConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, FinscopeError> {
        toml::from_str(text).map_err(|e| FinscopeError::SerializationError(format!("Config: {}", e)))
    }

    /// Load from an optional file, then apply process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, FinscopeError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, FinscopeError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            FinscopeError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(FinscopeError::SerializationError(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| FinscopeError::IoError(format!("Read config: {}", e)))?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(origins) = get(ENV_CORS_ORIGINS) {
            self.security.cors_origins = Some(origins);
        }
        if let Some(raw) = get(ENV_RATE_LIMIT) {
            match raw.trim().parse() {
                Ok(rate) => self.security.rate_limit = rate,
                Err(_) => tracing::warn!("Ignoring invalid {}: '{}'", ENV_RATE_LIMIT, raw),
            }
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.security.api_key = Some(key);
        }
    }

    /// Configured API key, if any and non-empty.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.security.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================
