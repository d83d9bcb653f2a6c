use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    /// Static API key accepted directly. When unset, only hashed keys
    /// from the `api_keys` table authenticate.
    pub api_key: Option<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("db_path", &self.db_path)
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "SHELF_BIND_ADDR", "127.0.0.1:8080");
        if !bind_addr.contains(':') {
            return Err(ConfigError::Invalid(
                "SHELF_BIND_ADDR must be host:port".to_string(),
            ));
        }

        let db_path = PathBuf::from(value_or_default(&lookup, "SHELF_DB_PATH", "shelf.db"));
        let api_key = optional_trimmed(&lookup, "SHELF_API_KEY");

        Ok(Self {
            bind_addr,
            db_path,
            api_key,
        })
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn config_defaults_without_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let config =
            AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string())).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("shelf.db"));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn config_rejects_bare_host_bind_addr() {
        let mut map = HashMap::new();
        map.insert("SHELF_BIND_ADDR", "localhost");
        let err = AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("SHELF_BIND_ADDR"));
    }

    #[test]
    fn config_redacts_api_key_in_debug() {
        let mut map = HashMap::new();
        map.insert("SHELF_API_KEY", "sensitive-key");
        let config =
            AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string())).unwrap();

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("sensitive-key"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
