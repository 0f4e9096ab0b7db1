//! Configuration for the Subscription API service.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use subtrack_db::{PgSettings, StorageBackend};

/// Deployment environment. Selects the storage backend and log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    /// SQLite file storage, human-readable logs
    Dev,
    /// PostgreSQL storage, JSON logs
    Prod,
}

impl FromStr for AppEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            _ => Err(ConfigError::Invalid("APP_ENV")),
        }
    }
}

/// Subscription API configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub env: AppEnv,
    /// Storage backend and its connection settings
    pub storage: StorageBackend,
    /// HTTP listen address
    pub http_address: SocketAddr,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: AppEnv::Dev,
            storage: StorageBackend::Sqlite {
                path: PathBuf::from("storage/storage.db"),
            },
            http_address: SocketAddr::from(([0, 0, 0, 0], 8082)),
            request_timeout: Duration::from_secs(4),
            metrics_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        let env: AppEnv = required("APP_ENV")?.parse()?;

        let storage = match env {
            AppEnv::Dev => StorageBackend::Sqlite {
                path: PathBuf::from(required("STORAGE_PATH")?),
            },
            AppEnv::Prod => StorageBackend::Postgres(PgSettings {
                host: required("PG_HOST")?,
                port: parse(required("PG_PORT")?, "PG_PORT")?,
                database: required("PG_DB_NAME")?,
                user: required("PG_USER")?,
                password: required("PG_PASS")?,
                max_connections: parse_or(var("PG_MAX_POOL_SIZE"), 1, "PG_MAX_POOL_SIZE")?,
                connect_attempts: parse_or(
                    var("PG_CONNECTION_ATTEMPTS"),
                    3,
                    "PG_CONNECTION_ATTEMPTS",
                )?,
                retry_delay: Duration::from_secs(parse_or(
                    var("PG_CONNECTION_TIMEOUT_SECS"),
                    30,
                    "PG_CONNECTION_TIMEOUT_SECS",
                )?),
            }),
        };

        let http_address = var("HTTP_ADDRESS")
            .unwrap_or_else(|| "0.0.0.0:8082".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_ADDRESS"))?;

        let request_timeout_secs: u64 =
            parse_or(var("REQUEST_TIMEOUT_SECS"), 4, "REQUEST_TIMEOUT_SECS")?;

        let metrics_enabled = var("METRICS_ENABLED")
            .unwrap_or_else(|| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            env,
            storage,
            http_address,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

fn parse<T: FromStr>(raw: String, key: &'static str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid(key))
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    default: T,
    key: &'static str,
) -> Result<T, ConfigError> {
    raw.map_or(Ok(default), |raw| parse(raw, key))
}

/// Configuration error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
