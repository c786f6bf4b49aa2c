//! Configuration management for quire.
//!
//! Loads configuration from ${QUIRE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for quire configuration and data directories.
    //!
    //! QUIRE_HOME resolution order:
    //! 1. QUIRE_HOME environment variable (if set)
    //! 2. ~/.config/quire (default)
    //! 3. ./.quire when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the quire home directory.
    pub fn quire_home() -> PathBuf {
        if let Ok(home) = std::env::var("QUIRE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".quire"),
            |h| h.join(".config").join("quire"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        quire_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn log_dir() -> PathBuf {
        quire_home()
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listener binds to.
    pub host: String,
    /// Port the listener binds to.
    pub port: u16,
    /// Directory holding `root.md` and `posts/*.md`.
    pub content_root: PathBuf,
    /// Name shown in the header before the current path.
    pub site_name: String,
    /// Push body updates through scroll-region syncs instead of full redraws.
    pub high_performance: bool,
    /// Seconds in-flight sessions get to finish before they are aborted.
    pub shutdown_grace_secs: u64,
}

impl Config {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 23234;
    pub const DEFAULT_CONTENT_ROOT: &'static str = "content";
    pub const DEFAULT_SITE_NAME: &'static str = "quire";
    pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

    /// Loads configuration from the default location.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Returns the listener address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the shutdown grace period.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            content_root: PathBuf::from(Self::DEFAULT_CONTENT_ROOT),
            site_name: Self::DEFAULT_SITE_NAME.to_string(),
            high_performance: true,
            shutdown_grace_secs: Self::DEFAULT_SHUTDOWN_GRACE_SECS,
        }
    }
}
