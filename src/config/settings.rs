use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::util::DataFile;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Battle server connection settings
    pub server: ServerConfig,
    /// Polling behaviour while waiting for results
    pub battle: BattleConfig,
    /// Location of the local Pokemon database
    pub database_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL, e.g. `http://127.0.0.1:5000`
    pub url: String,
    /// Skip TLS certificate validation
    pub accept_invalid_certs: bool,
    /// Per-request timeout
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct BattleConfig {
    /// Fixed delay between result polls
    pub poll_interval: Duration,
    /// Optional ceiling on the total polling time (None = wait forever)
    pub poll_timeout: Option<Duration>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            accept_invalid_certs: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            battle: BattleConfig::default(),
            database_path: DataFile::Database.path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub url: Option<String>,
    pub accept_invalid_certs: Option<bool>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlBattleConfig {
    pub poll_interval_ms: Option<u64>,
    pub poll_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStorageConfig {
    pub database_path: Option<PathBuf>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub server: Option<TomlServerConfig>,
    pub battle: Option<TomlBattleConfig>,
    pub storage: Option<TomlStorageConfig>,
}

impl Config {
    /// Load configuration from file, merging with defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = DataFile::Config.path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        if !config_file.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&config_file).map_err(|source| ConfigError::Read {
            path: config_file.clone(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse a config document and merge it on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(server) = toml_config.server {
            if let Some(url) = server.url {
                let trimmed = url.trim().trim_end_matches('/');
                if trimmed.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "server.url",
                        reason: "must not be empty".into(),
                    });
                }
                config.server.url = trimmed.to_string();
            }
            if let Some(accept) = server.accept_invalid_certs {
                config.server.accept_invalid_certs = accept;
            }
            if let Some(secs) = server.request_timeout_secs {
                config.server.request_timeout =
                    Duration::from_secs(require_positive("server.request_timeout_secs", secs)?);
            }
        }

        if let Some(battle) = toml_config.battle {
            if let Some(ms) = battle.poll_interval_ms {
                config.battle.poll_interval =
                    Duration::from_millis(require_positive("battle.poll_interval_ms", ms)?);
            }
            if let Some(secs) = battle.poll_timeout_secs {
                config.battle.poll_timeout =
                    Some(Duration::from_secs(require_positive("battle.poll_timeout_secs", secs)?));
            }
        }

        if let Some(storage) = toml_config.storage {
            if let Some(path) = storage.database_path {
                config.database_path = path;
            }
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server.url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.battle.poll_timeout = timeout;
        self
    }

    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database_path = path;
        self
    }
}

fn require_positive(key: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            reason: "must be greater than zero".into(),
        });
    }
    Ok(value)
}
