use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Insert the sample bakeries when the store starts out empty
    #[serde(default = "default_seed_if_empty")]
    pub seed_if_empty: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5555
}

fn default_database_url() -> String {
    "sqlite://app.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_seed_if_empty() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
            seed_if_empty: default_seed_if_empty(),
        }
    }
}

impl AppConfig {
    /// Load from `$BAKERY_CONFIG` (or `config.toml`), then apply env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("BAKERY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = url;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_classic_dev_server() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:5555");
        assert_eq!(config.storage.database_url, "sqlite://app.db");
        assert!(config.storage.seed_if_empty);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::parse(
            r#"
            [server]
            port = 8080

            [storage]
            seed_if_empty = false
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.max_connections, 5);
        assert!(!config.storage.seed_if_empty);
    }

    #[test]
    fn missing_file_is_default() {
        let config = AppConfig::from_file(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.server.port, 5555);
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> =
            HashMap::from([("PORT", "9000"), ("DATABASE_URL", "sqlite::memory:")]);
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.database_url, "sqlite::memory:");
    }

    #[test]
    fn bad_port_override_is_an_error() {
        let mut config = AppConfig::default();
        let result = config.apply_env_overrides(|key| (key == "PORT").then(|| "abc".to_string()));
        assert!(result.is_err());
    }
}
