//! Startup configuration, read from `config.json` (or the file named by
//! `RLB_CONFIG`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_derive::Deserialize;

use crate::error::ConfigError;
use crate::pool::TargetPool;

pub const CONFIG_ENV: &str = "RLB_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub load_balancer: ListenConfig,
    /// Upstream base URLs, in round-robin order.
    pub servers: Vec<String>,
    /// Per-request timeout for the upstream hop.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            load_balancer: ListenConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            servers: vec![
                "http://google.com".to_string(),
                "https://bing.com".to_string(),
                "http://duckduckgo.com".to_string(),
            ],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            workers: None,
        }
    }
}

impl Config {
    pub fn from_json(input: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_json(&input)
    }

    /// Load from `RLB_CONFIG` if set, else `config.json` if present, else defaults.
    pub fn load() -> Result<Config, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Config::load_from(explicit.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
    }

    fn load_from(explicit: Option<&Path>, default_path: &Path) -> Result<Config, ConfigError> {
        match explicit {
            Some(path) => Config::from_file(path),
            None if default_path.exists() => Config::from_file(default_path),
            None => {
                log::warn!(
                    "{} not found, using built-in upstreams",
                    default_path.display()
                );
                Ok(Config::default())
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn pool(&self) -> Result<TargetPool, ConfigError> {
        TargetPool::from_addresses(&self.servers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_config() {
        let config = Config::from_json(
            r#"{
                "load_balancer": { "host": "127.0.0.1", "port": 3000 },
                "servers": ["http://127.0.0.1:8080", "http://127.0.0.1:8081"],
                "timeout_secs": 5,
                "workers": 2
            }"#,
        )
        .unwrap();

        assert_eq!(config.load_balancer.host, "127.0.0.1");
        assert_eq!(config.load_balancer.port, 3000);
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.pool().unwrap().len(), 2);
    }

    #[test]
    fn optional_fields_default() {
        let config = Config::from_json(
            r#"{ "load_balancer": { "host": "0.0.0.0", "port": 80 }, "servers": ["http://a"] }"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.workers, None);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::from_json(
            r#"{ "load_balancer": { "host": "h", "port": 1 }, "servers": [], "retries": 3 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_server_fails_pool_construction() {
        let config = Config {
            servers: vec!["http://ok".to_string(), "".to_string()],
            ..Config::default()
        };
        assert!(matches!(
            config.pool(),
            Err(ConfigError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn default_config_builds_pool() {
        let config = Config::default();
        assert_eq!(config.load_balancer.port, 8080);
        assert_eq!(config.pool().unwrap().len(), 3);
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "load_balancer": {{ "host": "127.0.0.1", "port": 9999 }}, "servers": ["http://x"] }}"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path()), Path::new("unused.json")).unwrap();
        assert_eq!(config.load_balancer.port, 9999);
        assert_eq!(config.servers, vec!["http://x".to_string()]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = Config::load_from(Some(&missing), Path::new("unused.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn missing_default_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(None, &dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
