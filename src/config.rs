//! Client configuration

use crate::storage::FileStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://gamo.onrender.com";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub api_base: String,
    /// Ask the backend to generate character avatars
    pub need_avatar: bool,
    /// Avatar art style passed to the backend
    pub avatar_style: String,
    /// Per-request timeout; None waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Preference file location
    pub storage_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            need_avatar: true,
            avatar_style: "anime".to_string(),
            request_timeout: None,
            storage_path: FileStore::default_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: expected {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl ClientConfig {
    /// Defaults overridden by `GAMO_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `GAMO_*` key
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup("GAMO_API_BASE").filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup("GAMO_NEED_AVATAR") {
            config.need_avatar = parse_bool("GAMO_NEED_AVATAR", &value)?;
        }
        if let Some(style) = lookup("GAMO_AVATAR_STYLE").filter(|v| !v.trim().is_empty()) {
            config.avatar_style = style.trim().to_string();
        }
        if let Some(value) = lookup("GAMO_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "GAMO_TIMEOUT_SECS",
                expected: "a whole number of seconds",
                value: value.clone(),
            })?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(path) = lookup("GAMO_STORAGE_PATH").filter(|v| !v.trim().is_empty()) {
            config.storage_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "a boolean",
            value: value.to_string(),
        }),
    }
}
