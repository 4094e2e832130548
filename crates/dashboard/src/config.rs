//! Runtime configuration, read from `PRODBOARD_*` environment variables.

use thiserror::Error;

use prodboard_observability::{LogFormat, UnknownLogFormat};

use crate::store::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

pub const ENV_API_URL: &str = "PRODBOARD_API_URL";
pub const ENV_AUTH_TOKEN: &str = "PRODBOARD_AUTH_TOKEN";
pub const ENV_PAGE_SIZE: &str = "PRODBOARD_PAGE_SIZE";
pub const ENV_STORAGE: &str = "PRODBOARD_STORAGE";
pub const ENV_LOG_FORMAT: &str = "PRODBOARD_LOG_FORMAT";

/// Where the auth marker is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// `{app_data_dir}/prodboard/storage.db`.
    Default,
    /// Not persisted across runs.
    Memory,
    /// A `sqlite:` URL or a filesystem path.
    Sqlite(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{ENV_PAGE_SIZE} must be a positive integer (got {0:?})")]
    InvalidPageSize(String),

    #[error("{ENV_LOG_FORMAT}: {0}")]
    InvalidLogFormat(#[from] UnknownLogFormat),

    #[error("{ENV_API_URL} must start with http:// or https:// (got {0:?})")]
    InvalidApiUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub page_size: usize,
    pub storage: StorageLocation,
    pub log_format: LogFormat,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            storage: StorageLocation::Default,
            log_format: LogFormat::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let api_url = match get(ENV_API_URL) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => url,
            Some(url) => return Err(ConfigError::InvalidApiUrl(url)),
            None => defaults.api_url,
        };

        let page_size = match get(ENV_PAGE_SIZE) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidPageSize(raw)),
            },
            None => defaults.page_size,
        };

        let storage = match get(ENV_STORAGE) {
            Some(v) if v.eq_ignore_ascii_case("memory") => StorageLocation::Memory,
            Some(v) => StorageLocation::Sqlite(v),
            None => defaults.storage,
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => defaults.log_format,
        };

        Ok(Self {
            api_url,
            auth_token: get(ENV_AUTH_TOKEN),
            page_size,
            storage,
            log_format,
        })
    }
}
