use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use compact_str::{CompactString, ToCompactString};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::{
    client::{CacheConfig, ClientConfig},
    result::{AppError, Result},
};

/// Settings of the `gitlab-users` binary, stored as TOML
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// The URL of the GitLab instance
    pub gitlab_url: CompactString,
    /// The Personal Access Token to authenticate with GitLab
    pub gitlab_token: CompactString,
    /// Log level, or "Off"
    pub log_level: Option<CompactString>,
    /// Seconds a cached login or user stays valid
    pub cache_ttl_secs: Option<u64>,
    /// Upper bound on cached entries
    pub cache_max_entries: Option<u64>,
    /// Include the raw GitLab record in output
    #[serde(default)]
    pub include_raw: bool,
}

impl AppConfig {
    /// Apply `GITLAB_URL` and `GITLAB_TOKEN` overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("GITLAB_URL") {
            self.gitlab_url = url.into();
        }
        if let Ok(token) = std::env::var("GITLAB_TOKEN") {
            self.gitlab_token = token.into();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.gitlab_url.trim().is_empty() {
            return Err(AppError::MissingConfig("gitlab_url is required"));
        }
        if self.gitlab_token.trim().is_empty() {
            return Err(AppError::MissingConfig("gitlab_token is required"));
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_max_entries,
            time_to_live: self.cache_ttl_secs.map(Duration::from_secs),
        }
    }
}

impl From<AppConfig> for ClientConfig {
    fn from(config: AppConfig) -> Self {
        let cache = config.cache_config();
        Self::new(config.gitlab_url, config.gitlab_token)
            .with_include_raw(config.include_raw)
            .with_cache(cache)
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("gitlab-users.toml")
    } else {
        PathBuf::from("gitlab-users.toml")
    }
}

/// Load the config file, falling back to defaults when it does not exist
pub fn load_config(config_file: &Path) -> Result<AppConfig> {
    if !config_file.exists() {
        return Ok(AppConfig::default());
    }

    confy::load_path(config_file).map_err(|e| AppError::ConfigError(e.to_compact_string()))
}

pub fn save_config(config_file: &Path, config: &AppConfig) -> Result<()> {
    confy::store_path(config_file, config)
        .map_err(|e| AppError::ConfigError(e.to_compact_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            gitlab_url: "https://gitlab.example.com".into(),
            gitlab_token: "test-token".into(),
            log_level: Some("Off".into()),
            cache_ttl_secs: Some(600),
            cache_max_entries: None,
            include_raw: true,
        }
    }

    #[test]
    fn test_into_client_config() {
        let client_config = ClientConfig::from(sample_config());
        assert_eq!(client_config.base_url, "https://gitlab.example.com");
        assert_eq!(client_config.private_token, "test-token");
        assert!(client_config.include_raw);
        assert_eq!(client_config.cache.time_to_live, Some(Duration::from_secs(600)));
        assert_eq!(client_config.cache.max_entries, None);
    }

    #[test]
    fn test_validate() {
        assert!(sample_config().validate().is_ok());
        assert!(matches!(
            AppConfig::default().validate(),
            Err(AppError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitlab-users.toml");

        assert_eq!(load_config(&path).unwrap(), AppConfig::default());

        save_config(&path, &sample_config()).unwrap();
        assert_eq!(load_config(&path).unwrap(), sample_config());
    }
}
