use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const CONFIG_PATH_VAR: &str = "RIDELINK_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Id of the signed-in user; unread counts and likes are keyed by it.
    pub user_id: String,

    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Service generating initials avatars for users without a picture.
    #[serde(default = "default_avatar_placeholder_url")]
    pub avatar_placeholder_url: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            user_id: user_id.into(),
            http_timeout_secs: default_timeout_secs(),
            avatar_placeholder_url: default_avatar_placeholder_url(),
        }
    }

    /// Reads the file named by `RIDELINK_CONFIG` if set, the environment otherwise.
    pub fn load() -> Result<Self> {
        match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Self::from_env(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let user_id = env::var("RIDELINK_USER_ID")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| anyhow!("RIDELINK_USER_ID is not set"))?;
        let api_url = env::var("RIDELINK_API_URL").unwrap_or_else(|_| default_api_url());
        let http_timeout_secs = env::var("RIDELINK_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(default_timeout_secs);
        let avatar_placeholder_url = env::var("RIDELINK_AVATAR_PLACEHOLDER_URL")
            .unwrap_or_else(|_| default_avatar_placeholder_url());
        Ok(Self {
            api_url,
            user_id,
            http_timeout_secs,
            avatar_placeholder_url,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("failed to parse config")?;
        if config.user_id.trim().is_empty() {
            return Err(anyhow!("user_id must not be empty"));
        }
        Ok(config)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_api_url() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_avatar_placeholder_url() -> String {
    "https://ui-avatars.com/api/".to_string()
}
