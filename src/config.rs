use crate::estimation::vdi4707::DistanceMode;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_RECENT_LIMIT: u32 = 5;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub store: Option<StoreSection>,
    #[serde(default)]
    pub estimation: Option<EstimationSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    /// Port to listen on (default: 8080)
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSection {
    /// sqlx SQLite URL, e.g. `sqlite://data/lift-energy.db`. Absent keeps
    /// results in memory only.
    pub database_url: Option<String>,
    /// Number of past results shown next to a new one (default: 5)
    pub recent_limit: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EstimationSection {
    pub distance_mode: Option<DistanceMode>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

impl Config {
    /// Returns the server port (default: 8080)
    pub fn server_port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Returns the store URL, or `None` when empty or not configured.
    pub fn database_url(&self) -> Option<&str> {
        let url = self.store.as_ref()?.database_url.as_deref()?;
        if url.trim().is_empty() {
            None
        } else {
            Some(url)
        }
    }

    pub fn recent_limit(&self) -> u32 {
        self.store
            .as_ref()
            .and_then(|s| s.recent_limit)
            .unwrap_or(DEFAULT_RECENT_LIMIT)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::INFO)
    }
}
