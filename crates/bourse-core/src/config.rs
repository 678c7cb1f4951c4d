//! Process configuration, read once at startup from a fixed set of
//! environment keys.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use bourse_warehouse::{default_bourse_home, WarehouseConfig};
use serde::Serialize;
use thiserror::Error;

use crate::DEFAULT_HISTORY_DAYS;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_POOL_SIZE: usize = 4;

/// Every environment key the process reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Home,
    DbPath,
    PoolSize,
    BindAddr,
    CorsOrigins,
    AnomalyUrl,
    ForecastUrl,
    PortfolioUrl,
    HistoryDays,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::Home,
        ConfigKey::DbPath,
        ConfigKey::PoolSize,
        ConfigKey::BindAddr,
        ConfigKey::CorsOrigins,
        ConfigKey::AnomalyUrl,
        ConfigKey::ForecastUrl,
        ConfigKey::PortfolioUrl,
        ConfigKey::HistoryDays,
    ];

    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Home => "BOURSE_HOME",
            Self::DbPath => "BOURSE_DB_PATH",
            Self::PoolSize => "BOURSE_POOL_SIZE",
            Self::BindAddr => "BOURSE_BIND_ADDR",
            Self::CorsOrigins => "BOURSE_CORS_ORIGINS",
            Self::AnomalyUrl => "BOURSE_ANOMALY_URL",
            Self::ForecastUrl => "BOURSE_FORECAST_URL",
            Self::PortfolioUrl => "BOURSE_PORTFOLIO_URL",
            Self::HistoryDays => "BOURSE_HISTORY_DAYS",
        }
    }
}

/// A configuration key holds a value that cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{key} has invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl ConfigError {
    fn new(key: ConfigKey, value: &str, reason: &'static str) -> Self {
        Self {
            key: key.env_var(),
            value: value.to_owned(),
            reason,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
}

/// Base URLs of the collaborating services. They are advertised, never called.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollaboratorUrls {
    pub anomaly_detection: Option<String>,
    pub forecasting: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BourseConfig {
    pub warehouse: WarehouseConfig,
    pub server: ServerConfig,
    pub collaborators: CollaboratorUrls,
    pub default_history_days: usize,
}

impl BourseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key.env_var()).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(ConfigKey) -> Option<String>,
    {
        let read = |key: ConfigKey| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let home = read(ConfigKey::Home)
            .map(PathBuf::from)
            .unwrap_or_else(default_bourse_home);
        let mut warehouse = WarehouseConfig::in_home(home);
        if let Some(db_path) = read(ConfigKey::DbPath) {
            warehouse.db_path = PathBuf::from(db_path);
        }
        warehouse.max_pool_size = match read(ConfigKey::PoolSize) {
            Some(value) => parse_positive(ConfigKey::PoolSize, &value)?,
            None => DEFAULT_POOL_SIZE,
        };

        let bind_addr = read(ConfigKey::BindAddr).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_addr.parse::<SocketAddr>().map_err(|_| {
            ConfigError::new(ConfigKey::BindAddr, &bind_addr, "expected HOST:PORT")
        })?;

        let cors_origins = match read(ConfigKey::CorsOrigins) {
            Some(value) => parse_origins(&value)?,
            None => vec![DEFAULT_CORS_ORIGIN.to_owned()],
        };

        let collaborators = CollaboratorUrls {
            anomaly_detection: read_url(ConfigKey::AnomalyUrl, read(ConfigKey::AnomalyUrl))?,
            forecasting: read_url(ConfigKey::ForecastUrl, read(ConfigKey::ForecastUrl))?,
            portfolio: read_url(ConfigKey::PortfolioUrl, read(ConfigKey::PortfolioUrl))?,
        };

        let default_history_days = match read(ConfigKey::HistoryDays) {
            Some(value) => parse_positive(ConfigKey::HistoryDays, &value)?,
            None => DEFAULT_HISTORY_DAYS,
        };

        Ok(Self {
            warehouse,
            server: ServerConfig {
                bind_addr,
                cors_origins,
            },
            collaborators,
            default_history_days,
        })
    }
}

fn parse_positive(key: ConfigKey, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::new(key, value, "expected a positive integer")),
    }
}

fn parse_origins(value: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_owned())
        .collect();

    if origins.iter().any(|origin| !is_http_url(origin) && origin != "*") {
        return Err(ConfigError::new(
            ConfigKey::CorsOrigins,
            value,
            "origins must be http(s) URLs or '*'",
        ));
    }
    Ok(origins)
}

fn read_url(key: ConfigKey, value: Option<String>) -> Result<Option<String>, ConfigError> {
    match value {
        Some(url) if is_http_url(&url) => Ok(Some(url.trim_end_matches('/').to_owned())),
        Some(url) => Err(ConfigError::new(key, &url, "expected an http(s) URL")),
        None => Ok(None),
    }
}

fn is_http_url(value: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        value
            .strip_prefix(scheme)
            .is_some_and(|rest| !rest.is_empty())
    })
}
