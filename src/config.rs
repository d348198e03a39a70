use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OpsdeckConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub client: ClientConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

/// Agent-side settings: where the fire-and-forget loggers post to.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of a running hub (e.g. `http://localhost:7411`). `None` means
    /// logging calls warn and skip — never a startup failure.
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub feed_limit: usize,
    pub stats_window_hours: i64,
    pub cache_ttl_secs: u64,
}

impl Default for OpsdeckConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            client: ClientConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 7411,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_opsdeck_dir()
            .join("opsdeck.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_url: None }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feed_limit: 50,
            stats_window_hours: 24,
            cache_ttl_secs: 300,
        }
    }
}

/// Returns `~/.opsdeck/`
pub fn default_opsdeck_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".opsdeck")
}

/// Returns the default config file path: `~/.opsdeck/config.toml`
pub fn default_config_path() -> PathBuf {
    default_opsdeck_dir().join("config.toml")
}

impl OpsdeckConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            OpsdeckConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (OPSDECK_DB, OPSDECK_HOST,
    /// OPSDECK_PORT, OPSDECK_LOG_LEVEL, OPSDECK_URL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("OPSDECK_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("OPSDECK_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("OPSDECK_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("OPSDECK_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("OPSDECK_URL") {
            self.client.base_url = Some(val);
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
