//! Client Configuration
//!
//! Configuration for the shim client, currently just the store
//! connection url.

use serde::{Deserialize, Serialize};

/// Connection url used when nothing else is configured.
pub const DEFAULT_CONN_URL: &str = "docstore://localhost:27017/db";

/// Environment variable consulted by [`DbConfig::from_env`].
pub const CONN_URL_ENV: &str = "SHIMDB_CONN_URL";

/// Shim client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Store connection url (default: [`DEFAULT_CONN_URL`])
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    DEFAULT_CONN_URL.to_string()
}

impl Default for DbConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl DbConfig {
    /// Create a config with the specified connection url
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Create a config from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let url = std::env::var(CONN_URL_ENV).unwrap_or_else(|_| default_url());
        Self { url }
    }
}
