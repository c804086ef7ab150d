//! Configuration management for GitLab client

use std::{path::PathBuf, time::Duration};

use compact_str::CompactString;

use super::error::{ClientError, Result};

/// Main configuration for GitLab client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GitLab instance root URL, without the `/api/v4` prefix
    pub base_url: CompactString,
    /// Private access token
    pub private_token: CompactString,
    /// Attach the provider record to every returned user
    pub include_raw: bool,
    /// Request configuration
    pub request: RequestConfig,
    /// Memoization configuration
    pub cache: CacheConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout
    pub timeout: Duration,
}

/// Eviction policy for the auth and user caches.
///
/// Both limits unset keeps every entry for the lifetime of the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheConfig {
    /// Upper bound on entries per cache
    pub max_entries: Option<u64>,
    /// Time an entry stays valid after insertion
    pub time_to_live: Option<Duration>,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Enable debug logging of HTTP responses
    pub log_responses: bool,
    /// Directory for storing debug logs
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30) }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("gitlab-users-logs")),
        }
    }
}

impl CacheConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(
        base_url: impl Into<CompactString>,
        private_token: impl Into<CompactString>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            private_token: private_token.into(),
            include_raw: false,
            request: RequestConfig::default(),
            cache: CacheConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config("Base URL cannot be empty"));
        }

        if self.private_token.is_empty() {
            return Err(ClientError::config("Private token cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config("Base URL must start with http:// or https://"));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config("Timeout must be greater than zero"));
        }

        if self.cache.max_entries == Some(0) {
            return Err(ClientError::config_validation("cache.max_entries", "must be at least 1"));
        }

        if self.cache.time_to_live.is_some_and(|ttl| ttl.is_zero()) {
            return Err(ClientError::config_validation(
                "cache.time_to_live",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Root URL with any trailing slash removed
    pub fn root_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Attach provider records to returned users
    pub fn with_include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set cache eviction policy
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Enable debug logging
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<CompactString>,
    private_token: Option<CompactString>,
    include_raw: bool,
    request: Option<RequestConfig>,
    cache: Option<CacheConfig>,
    debug: Option<DebugConfig>,
}

impl ClientConfigBuilder {
    /// Set base URL
    pub fn base_url(mut self, url: impl Into<CompactString>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set private token
    pub fn private_token(mut self, token: impl Into<CompactString>) -> Self {
        self.private_token = Some(token.into());
        self
    }

    /// Attach provider records to returned users
    pub fn include_raw(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }

    /// Set cache eviction policy
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set debug configuration
    pub fn debug(mut self, debug: DebugConfig) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Enable debug logging
    pub fn debug_logging(mut self, enabled: bool) -> Self {
        let mut debug = self.debug.unwrap_or_default();
        debug.log_responses = enabled;
        self.debug = Some(debug);
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let mut request = self.request.unwrap_or_default();
        request.timeout = timeout;
        self.request = Some(request);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::config("Base URL is required"))?;
        let private_token = self
            .private_token
            .ok_or_else(|| ClientError::config("Private token is required"))?;

        let config = ClientConfig {
            base_url,
            private_token,
            include_raw: self.include_raw,
            request: self.request.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
            debug: self.debug.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::builder()
            .base_url("https://gitlab.example.com")
            .private_token("test-token")
            .include_raw(true)
            .cache(CacheConfig::unbounded().with_max_entries(500))
            .debug_logging(true)
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://gitlab.example.com");
        assert_eq!(config.private_token, "test-token");
        assert!(config.include_raw);
        assert_eq!(config.cache.max_entries, Some(500));
        assert_eq!(config.cache.time_to_live, None);
        assert!(config.debug.log_responses);
    }

    #[test]
    fn test_builder_requires_fields() {
        let result = ClientConfig::builder().private_token("token").build();
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_config_validation() {
        // Valid config
        let config = ClientConfig::new("https://gitlab.com", "token");
        assert!(config.validate().is_ok());

        // Empty base URL
        let config = ClientConfig::new("", "token");
        assert!(config.validate().is_err());

        // Empty token
        let config = ClientConfig::new("https://gitlab.com", "");
        assert!(config.validate().is_err());

        // Invalid URL
        let config = ClientConfig::new("not-a-url", "token");
        assert!(config.validate().is_err());

        // Zero-sized cache
        let config = ClientConfig::new("https://gitlab.com", "token")
            .with_cache(CacheConfig::unbounded().with_max_entries(0));
        assert!(matches!(config.validate(), Err(ClientError::ConfigValidation { .. })));

        let config = ClientConfig::new("https://gitlab.com", "token")
            .with_cache(CacheConfig::unbounded().with_time_to_live(Duration::ZERO));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_root_url_trims_trailing_slash() {
        let config = ClientConfig::new("https://gitlab.com/", "token");
        assert_eq!(config.root_url(), "https://gitlab.com");
    }

    #[test]
    fn test_default_cache_is_unbounded() {
        let config = ClientConfig::new("https://gitlab.com", "token");
        assert_eq!(config.cache, CacheConfig::unbounded());
        assert!(!config.include_raw);
    }
}
