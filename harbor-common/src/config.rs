//! Service configuration resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! There are no embedded credentials anywhere in this chain: the database is
//! a local SQLite file provisioned by the data collaborator, and everything
//! is overridable from the environment.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default listen port when nothing else is configured
pub const DEFAULT_PORT: u16 = 8000;

/// Environment variable naming the market database file
pub const DATABASE_PATH_ENV: &str = "HARBOR_DATABASE";

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "HARBOR_PORT";

/// Environment variable with a comma-separated CORS origin list
pub const ALLOWED_ORIGINS_ENV: &str = "HARBOR_ALLOWED_ORIGINS";

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub database_path: PathBuf,
    pub allowed_origins: Vec<String>,
}

/// Optional overrides read from a TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub allowed_origins: Option<Vec<String>>,
}

impl TomlConfig {
    /// Load from an explicit path. An unreadable or malformed file is an
    /// error here: the operator named it, so silently ignoring it would
    /// mask a typo.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Probe the default config locations. Missing files fall through to
    /// defaults; startup never fails because no config file exists.
    pub fn load_default_locations() -> Self {
        for path in default_config_paths() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring config file {}: {e}", path.display());
                    }
                }
            }
        }
        Self::default()
    }
}

/// Config file probe order: working directory first, then the per-user
/// config directory.
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("harbor.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("harbor").join("harbor.toml"));
    }
    paths
}

/// OS-dependent default location of the market database
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("harbor").join("market.db"))
        .unwrap_or_else(|| PathBuf::from("market.db"))
}

impl ServiceConfig {
    /// Resolve the full configuration from CLI values, the environment, and
    /// an optional TOML file.
    pub fn resolve(
        cli_database: Option<PathBuf>,
        cli_port: Option<u16>,
        config_file: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_file {
            Some(path) => TomlConfig::load(path)?,
            None => TomlConfig::load_default_locations(),
        };

        let database_path = cli_database
            .or_else(|| std::env::var(DATABASE_PATH_ENV).ok().map(PathBuf::from))
            .or(file.database_path)
            .unwrap_or_else(default_database_path);

        let port = match cli_port {
            Some(port) => port,
            None => match std::env::var(PORT_ENV) {
                Ok(value) => value
                    .parse()
                    .map_err(|_| Error::Config(format!("invalid {PORT_ENV} value: {value}")))?,
                Err(_) => file.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let allowed_origins = match std::env::var(ALLOWED_ORIGINS_ENV) {
            Ok(value) => value
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            Err(_) => file
                .allowed_origins
                .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]),
        };

        Ok(Self {
            port,
            database_path,
            allowed_origins,
        })
    }
}
