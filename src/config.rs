//! # Service Configuration
//!
//! Loaded from a JSON file; every field has a default. Secrets may instead be
//! supplied through the environment (a `.env` file is honoured by the CLI):
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `NEWSDESK_STORE_URL` | `store.url` |
//! | `NEWSDESK_STORE_KEY` | `store.api_key` |
//! | `NEWSDESK_JWT_SECRET` | `auth.jwt_secret` |
//! | `NEWSDESK_PORT` | `server.port` |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::crypto::is_valid_hash;
use crate::auth::{Account, JwtConfig};
use crate::http_server::HttpServerConfig;
use crate::query::{PageLimits, DEFAULT_LIMIT, MAX_LIMIT};
use crate::store::PostgrestConfig;

pub const ENV_STORE_URL: &str = "NEWSDESK_STORE_URL";
pub const ENV_STORE_KEY: &str = "NEWSDESK_STORE_KEY";
pub const ENV_JWT_SECRET: &str = "NEWSDESK_JWT_SECRET";
pub const ENV_PORT: &str = "NEWSDESK_PORT";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Token signing and accepted accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing secret
    #[serde(default)]
    pub jwt_secret: String,

    /// Token lifetime in seconds (default: 3600)
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    #[serde(default = "default_token_party")]
    pub issuer: String,

    #[serde(default = "default_token_party")]
    pub audience: String,

    /// Accounts allowed to log in
    #[serde(default)]
    pub users: Vec<Account>,
}

/// Longest token lifetime accepted (one year)
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_token_party() -> String {
    "newsdesk".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl_secs(),
            issuer: default_token_party(),
            audience: default_token_party(),
            users: Vec::new(),
        }
    }
}

impl AuthSettings {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            access_token_ttl: chrono::Duration::seconds(
                self.token_ttl_secs.clamp(0, MAX_TOKEN_TTL_SECS),
            ),
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
        }
    }
}

/// Paging policy for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    #[serde(default = "max_limit")]
    pub max_limit: u64,

    /// Delay before running list queries, for exercising client loading states
    #[serde(default)]
    pub list_delay_ms: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

fn max_limit() -> u64 {
    MAX_LIMIT
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            list_delay_ms: 0,
        }
    }
}

impl QuerySettings {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        }
    }

    pub fn list_delay(&self) -> Duration {
        Duration::from_millis(self.list_delay_ms)
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub store: PostgrestConfig,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub query: QuerySettings,

    /// Log level (error, warn, info, debug, trace); `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Read and parse a config file, then apply process environment overrides.
    /// Does not validate; call [`AppConfig::validate`] once the store is chosen.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment)
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_STORE_URL) {
            self.store.url = url;
        }
        if let Some(key) = lookup(ENV_STORE_KEY) {
            self.store.api_key = key;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
        if let Some(port) = lookup(ENV_PORT).and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
    }

    /// Check the configuration is usable. The store URL is only required when
    /// the PostgREST backend will be used.
    pub fn validate(&self, require_store: bool) -> ConfigResult<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "auth.jwt_secret is empty (set it in the file or via {})",
                ENV_JWT_SECRET
            )));
        }

        if self.auth.token_ttl_secs <= 0 || self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_secs must be between 1 and {}",
                MAX_TOKEN_TTL_SECS
            )));
        }

        for user in &self.auth.users {
            if !is_valid_hash(&user.password_hash) {
                return Err(ConfigError::Invalid(format!(
                    "auth.users entry '{}' has an invalid password_hash (use `newsdesk hash-password`)",
                    user.email
                )));
            }
        }

        if self.query.max_limit == 0 {
            return Err(ConfigError::Invalid("query.max_limit must be > 0".to_string()));
        }

        if self.query.default_limit == 0 || self.query.default_limit > self.query.max_limit {
            return Err(ConfigError::Invalid(format!(
                "query.default_limit must be between 1 and max_limit ({})",
                self.query.max_limit
            )));
        }

        if require_store && self.store.url.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "store.url is empty (set it in the file or via {})",
                ENV_STORE_URL
            )));
        }

        Ok(())
    }
}
