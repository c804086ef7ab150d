//! High-level GitLab user service operations

use std::sync::Arc;

use async_trait::async_trait;
use compact_str::CompactString;
use futures::future::try_join_all;
use tracing::{debug, info, instrument, warn};

use super::{
    api::GitlabApi,
    cache::UserCache,
    config::ClientConfig,
    error::{ClientError, Result},
};
use crate::{
    domain::User,
    id::UserId,
    user_service::{SearchOptions, UserService},
};

/// User service backed by the GitLab REST API
///
/// Memoizes successful logins and every user lookup, absent users included.
#[derive(Debug, Clone)]
pub struct GitlabUserService {
    api: Arc<GitlabApi>,
    cache: UserCache,
}

impl GitlabUserService {
    /// Create a new GitLab user service
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = Arc::new(GitlabApi::new(config)?);
        Ok(Self::from_api(api))
    }

    /// Create service from existing API client
    pub fn from_api(api: Arc<GitlabApi>) -> Self {
        let cache = UserCache::new(&api.config().cache);
        Self { api, cache }
    }

    /// Verify `login` and `password`, then resolve the user.
    ///
    /// A credential pair that passed once is not exchanged again for the
    /// lifetime of the cache entry, so a password revoked in the meantime
    /// still resolves.
    #[instrument(skip(self, password))]
    pub async fn auth(&self, login: &str, password: &str) -> Result<Option<User>> {
        if self.cache.is_authenticated(login, password) {
            debug!("Credentials verified earlier, skipping token exchange");
        } else {
            info!("Exchanging credentials with GitLab");
            if self.api.request_password_token(login, password).await?.is_none() {
                warn!("GitLab token endpoint not found");
                return Ok(None);
            }
            self.cache.mark_authenticated(login, password);
        }

        self.get(login).await
    }

    /// Resolve a user by login name
    #[instrument(skip(self))]
    pub async fn get(&self, login: &str) -> Result<Option<User>> {
        if let Some(cached) = self.cache.user(login) {
            debug!(found = cached.is_some(), "User served from cache");
            return Ok(cached);
        }

        let user = match self.api.find_user_by_username(login).await? {
            Some(summary) => self.fetch_user(summary.id).await?,
            None => None,
        };

        debug!(found = user.is_some(), "User fetched from GitLab");
        self.cache.insert_user(login, user.clone());
        Ok(user)
    }

    /// Resolve all `logins` concurrently, dropping unknown ones.
    ///
    /// The first failed lookup fails the whole call.
    #[instrument(skip(self, logins), fields(login_count = logins.len()))]
    pub async fn list(&self, logins: &[CompactString]) -> Result<Vec<User>> {
        let lookups = logins.iter().map(|login| self.get(login));
        let users: Vec<User> = try_join_all(lookups).await?.into_iter().flatten().collect();

        debug!(user_count = users.len(), "Listed users");
        Ok(users)
    }

    /// GitLab user search is not supported; always empty.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<User>> {
        debug!("User search is not supported by the GitLab adapter");
        Ok(Vec::new())
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Get reference to the underlying API client
    pub fn api(&self) -> &GitlabApi {
        &self.api
    }

    /// Get reference to the memo caches
    pub fn cache(&self) -> &UserCache {
        &self.cache
    }

    async fn fetch_user(&self, id: UserId) -> Result<Option<User>> {
        let (record, raw) = self.api.get_user(id).await?.unzip();

        Ok(match (User::from_provider(record), raw) {
            (Some(user), Some(raw)) if self.config().include_raw => Some(user.with_raw(raw)),
            (user, _) => user,
        })
    }
}

#[async_trait]
impl UserService for GitlabUserService {
    type Error = ClientError;

    async fn auth(&self, login: &str, password: &str) -> Result<Option<User>> {
        GitlabUserService::auth(self, login, password).await
    }

    async fn get(&self, login: &str) -> Result<Option<User>> {
        GitlabUserService::get(self, login).await
    }

    async fn list(&self, logins: &[CompactString]) -> Result<Vec<User>> {
        GitlabUserService::list(self, logins).await
    }

    async fn search(&self, query: &str, options: SearchOptions) -> Result<Vec<User>> {
        GitlabUserService::search(self, query, options).await
    }
}
