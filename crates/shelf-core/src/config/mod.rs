//! Client-side configuration and on-disk layout.
//!
//! Everything the CLI persists lives under one base directory
//! (`~/.shelf` by default, overridable via `SHELF_HOME`): a JSON config
//! file, the script cache, the bin directory for installed scripts, and
//! the last-sync marker.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

const CONFIG_FILE_NAME: &str = "config.json";
const CACHE_DIR_NAME: &str = "cache";
const BIN_DIR_NAME: &str = "bin";
const LAST_SYNC_FILE_NAME: &str = ".last-sync";

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// On-disk layout rooted at the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub base_dir: PathBuf,
    pub config_file: PathBuf,
    pub cache_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub last_sync_file: PathBuf,
}

impl Paths {
    #[must_use]
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            config_file: base_dir.join(CONFIG_FILE_NAME),
            cache_dir: base_dir.join(CACHE_DIR_NAME),
            bin_dir: base_dir.join(BIN_DIR_NAME),
            last_sync_file: base_dir.join(LAST_SYNC_FILE_NAME),
            base_dir,
        }
    }

    /// Resolve the base directory from `SHELF_HOME` or the home directory.
    #[must_use]
    pub fn resolve() -> Self {
        let base = env::var_os("SHELF_HOME").map_or_else(
            || {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".shelf")
            },
            PathBuf::from,
        );
        Self::new(base)
    }

    /// Create the base, cache, and bin directories if missing.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(&self.bin_dir)?;
        Ok(())
    }
}

/// Persistent client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "generate_device_id")]
    pub device_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            api_key: None,
            device_id: generate_device_id(),
        }
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

/// Generate a per-installation device identifier for audit-log
/// attribution: hostname (when known) plus a short random suffix.
fn generate_device_id() -> String {
    let host = env::var("HOSTNAME")
        .or_else(|_| env::var("COMPUTERNAME"))
        .ok()
        .and_then(|value| normalize_text_option(Some(value)))
        .unwrap_or_else(|| "device".to_string());
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
    format!("{host}-{suffix}")
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing.
    /// A corrupt file is treated as absent but logged, so a damaged config
    /// does not block an otherwise-healthy client.
    #[must_use]
    pub fn load(paths: &Paths) -> Self {
        if !paths.config_file.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&paths.config_file)
            .map_err(Error::from)
            .and_then(|raw| serde_json::from_str::<Self>(&raw).map_err(Error::from))
        {
            Ok(mut config) => {
                config.normalize();
                config
            }
            Err(error) => {
                tracing::warn!(
                    path = %paths.config_file.display(),
                    %error,
                    "Config file is unreadable, falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Load the config, persisting a freshly generated one on first run
    /// so the device id stays stable across invocations.
    pub fn load_or_init(paths: &Paths) -> Result<Self> {
        let config = Self::load(paths);
        if !paths.config_file.exists() {
            config.save(paths)?;
        }
        Ok(config)
    }

    pub fn save(&self, paths: &Paths) -> Result<()> {
        paths.ensure()?;
        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(&paths.config_file, serialized)?;
        Ok(())
    }

    pub fn set_server_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !is_http_url(url) {
            return Err(Error::Config(
                "Server URL must start with http:// or https://".to_string(),
            ));
        }
        self.server_url = url.trim_end_matches('/').to_string();
        Ok(())
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && !self.server_url.is_empty()
    }

    fn normalize(&mut self) {
        self.api_key = normalize_text_option(self.api_key.take());
        self.server_url = self.server_url.trim().trim_end_matches('/').to_string();
        if self.server_url.is_empty() {
            self.server_url = default_server_url();
        }
    }
}

/// Read the last-sync marker, 0 when absent or unreadable.
///
/// Display bookkeeping only: conflict detection always compares each
/// script's own stored timestamps, never this global checkpoint.
#[must_use]
pub fn last_sync_timestamp(paths: &Paths) -> i64 {
    std::fs::read_to_string(&paths.last_sync_file)
        .ok()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

pub fn set_last_sync_timestamp(paths: &Paths, timestamp: i64) -> Result<()> {
    paths.ensure()?;
    std::fs::write(&paths.last_sync_file, timestamp.to_string())?;
    Ok(())
}
