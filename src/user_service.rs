//! Provider-agnostic user service contract

use async_trait::async_trait;
use compact_str::CompactString;

use crate::domain::User;

/// Default number of users a search may return
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Optional parameters of [`UserService::search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of users returned
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: DEFAULT_SEARCH_LIMIT }
    }
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Lookup and authentication of users against an identity provider.
///
/// `Ok(None)` means the user does not exist; errors are reserved for
/// failed calls.
#[async_trait]
pub trait UserService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Verify credentials, then resolve the user behind them
    async fn auth(&self, login: &str, password: &str) -> Result<Option<User>, Self::Error>;

    /// Resolve a user by login name
    async fn get(&self, login: &str) -> Result<Option<User>, Self::Error>;

    /// Resolve several users, silently dropping unknown logins
    async fn list(&self, logins: &[CompactString]) -> Result<Vec<User>, Self::Error>;

    /// Find users matching `query`
    async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<User>, Self::Error>;
}
