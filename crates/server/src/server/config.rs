use serde::Deserialize;
use std::fs;
use std::path::Path;
use svcprobe_common::Environment;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `SVCPROBE_LISTEN_ADDRESS`.
pub const ENV_PREFIX: &str = "SVCPROBE_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Service catalog location. When unset the catalog loader picks the path.
    #[serde(default)]
    pub catalog_path: Option<String>,

    #[serde(default)]
    pub default_environment: Environment,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Batch reports are written here when set.
    #[serde(default)]
    pub results_dir: Option<String>,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
pub struct PartialServerConfig {
    listen_address: Option<String>,
    catalog_path: Option<String>,
    default_environment: Option<Environment>,
    request_timeout_ms: Option<u64>,
    results_dir: Option<String>,
    log_dir: Option<String>,
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::merge(PartialServerConfig::default(), PartialServerConfig::default())
    }
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config = match config_path {
            Some(path_str) if Path::new(path_str).exists() => Self::read_file(path_str)?,
            _ => PartialServerConfig::default(),
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::prefixed(ENV_PREFIX).from_env()?;

        // 3. Merge: environment overrides file
        Ok(Self::merge(env_config, file_config))
    }

    pub fn read_file(path_str: &str) -> Result<PartialServerConfig, ConfigError> {
        let contents = fs::read_to_string(path_str).map_err(|e| ConfigError::Read {
            path: path_str.to_string(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path_str.to_string(),
            source: e,
        })
    }

    /// Fields set in `preferred` win over `fallback`; defaults fill the rest.
    pub fn merge(preferred: PartialServerConfig, fallback: PartialServerConfig) -> Self {
        ServerConfig {
            listen_address: preferred
                .listen_address
                .or(fallback.listen_address)
                .unwrap_or_else(default_listen_address),
            catalog_path: preferred.catalog_path.or(fallback.catalog_path),
            default_environment: preferred
                .default_environment
                .or(fallback.default_environment)
                .unwrap_or_default(),
            request_timeout_ms: preferred
                .request_timeout_ms
                .or(fallback.request_timeout_ms)
                .unwrap_or_else(default_request_timeout_ms),
            results_dir: preferred.results_dir.or(fallback.results_dir),
            log_dir: preferred
                .log_dir
                .or(fallback.log_dir)
                .unwrap_or_else(default_log_dir),
        }
    }
}
