use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "http://localhost:4000/api";
pub const DEFAULT_DATA_DIR: &str = ".stockroom";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 3_000;

// Client configuration sourced from environment variables. The data access
// layer receives this at construction time; nothing reads the environment at
// call sites.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote product API.
    pub api_base: String,
    /// Directory holding the local fallback store's data file.
    pub data_dir: PathBuf,
    /// Transport-level timeout; expiry surfaces as an opaque request failure.
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ClientConfigOverride {
    api_base: Option<String>,
    data_dir: Option<PathBuf>,
    request_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("STOCKROOM_API_BASE") {
            config.api_base = value;
        }
        if let Ok(value) = std::env::var("STOCKROOM_DATA_DIR") {
            config.data_dir = PathBuf::from(value);
        }
        if let Some(value) = read_u64_env("STOCKROOM_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = value;
        }
        config
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env();
        if let Ok(path) = std::env::var("STOCKROOM_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read STOCKROOM_CONFIG: {path}"))?;
            let override_cfg: ClientConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse stockroom config yaml")?;
            if let Some(value) = override_cfg.api_base {
                config.api_base = value;
            }
            if let Some(value) = override_cfg.data_dir {
                config.data_dir = value;
            }
            if let Some(value) = override_cfg.request_timeout_ms {
                config.request_timeout_ms = value;
            }
        }
        Ok(config)
    }
}

fn read_u64_env(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
}
