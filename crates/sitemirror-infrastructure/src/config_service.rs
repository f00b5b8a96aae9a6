//! Client configuration loading.
//!
//! Priority: `config.toml` > environment overrides > built-in defaults.
//! Environment variables only fill in what the file leaves at its default,
//! so an explicit file value always wins.

use sitemirror_core::Result;
use sitemirror_core::config::ClientConfig;
use std::env;

use crate::paths::MirrorPaths;
use crate::storage::AtomicTomlFile;

pub const BASE_URL_ENV: &str = "SITEMIRROR_BASE_URL";
pub const LOG_LEVEL_ENV: &str = "SITEMIRROR_LOG";

/// Loads and saves [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(paths: &MirrorPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
        }
    }

    /// Loads the configuration, reading overrides from the process environment.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with_env(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an injectable environment lookup.
    pub fn load_with_env<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_file = self.file.load()?;
        let file_present = from_file.is_some();
        let mut config = from_file.unwrap_or_default();
        let defaults = ClientConfig::default();

        if (!file_present || config.base_url == defaults.base_url)
            && let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty())
        {
            tracing::debug!("[Config] base_url taken from {}", BASE_URL_ENV);
            config.base_url = url;
        }

        if (!file_present || config.log_level == defaults.log_level)
            && let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty())
        {
            config.log_level = level;
        }

        Ok(config)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config)?;
        tracing::info!("[Config] Saved configuration to {:?}", self.file.path());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(&MirrorPaths::new(Some(dir.path())).unwrap())
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = service(&temp_dir).load_with_env(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_env_fills_default_base_url() {
        let temp_dir = TempDir::new().unwrap();
        let config = service(&temp_dir)
            .load_with_env(|key| (key == BASE_URL_ENV).then(|| "http://mirror.lan".to_string()))
            .unwrap();
        assert_eq!(config.base_url, "http://mirror.lan");
    }

    #[test]
    fn test_file_value_beats_env() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "base_url = \"http://from-file:5000\"\nchat_poll_interval_secs = 10\n",
        )
        .unwrap();

        let config = service(&temp_dir)
            .load_with_env(|key| match key {
                BASE_URL_ENV => Some("http://from-env".to_string()),
                LOG_LEVEL_ENV => Some("debug".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.base_url, "http://from-file:5000");
        assert_eq!(config.chat_poll_interval_secs, 10);
        // log_level was left at its default in the file
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let svc = service(&temp_dir);
        let config = ClientConfig::default().with_base_url("http://saved");
        svc.save(&config).unwrap();
        assert_eq!(svc.load_with_env(|_| None).unwrap(), config);
    }
}
