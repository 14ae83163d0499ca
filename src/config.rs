use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::RAKUTEN_BOOKS_URL;
use crate::completion::HUGGINGFACE_MODEL_URL;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub rakuten_api_url: String,
    pub rakuten_app_id: String,
    pub huggingface_api_url: String,
    pub huggingface_api_key: String,
    pub external_timeout: Duration,
    pub shuffle_seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let rakuten_app_id = required("RAKUTEN_APP_ID")?;
        let huggingface_api_key = required("HUGGINGFACE_API_KEY")?;

        Ok(Self {
            bind_addr: lookup("BOOKCHAT_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            static_dir: lookup("BOOKCHAT_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            rakuten_api_url: lookup("RAKUTEN_API_URL")
                .unwrap_or_else(|| RAKUTEN_BOOKS_URL.to_string()),
            rakuten_app_id,
            huggingface_api_url: lookup("HUGGINGFACE_API_URL")
                .unwrap_or_else(|| HUGGINGFACE_MODEL_URL.to_string()),
            huggingface_api_key,
            external_timeout: Duration::from_secs(
                lookup("EXTERNAL_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(15),
            ),
            shuffle_seed: lookup("BOOKCHAT_SHUFFLE_SEED").and_then(|v| v.parse().ok()),
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("static_dir", &self.static_dir)
            .field("rakuten_api_url", &self.rakuten_api_url)
            .field("rakuten_app_id", &"<redacted>")
            .field("huggingface_api_url", &self.huggingface_api_url)
            .field("huggingface_api_key", &"<redacted>")
            .field("external_timeout", &self.external_timeout)
            .field("shuffle_seed", &self.shuffle_seed)
            .finish()
    }
}
