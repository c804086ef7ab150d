//! Memoization of successful logins and user lookups

use compact_str::{format_compact, CompactString};
use moka::sync::Cache;

use super::config::CacheConfig;
use crate::domain::User;

/// Separates login and password in the auth-cache key
const CREDENTIAL_DELIMITER: char = '\u{1f}';

/// Per-service caches for `auth` and `get`.
///
/// Absent users are memoized too, so an unknown login costs a single
/// lookup. There is no single-flight: concurrent misses on the same key
/// all reach the network.
#[derive(Clone)]
pub struct UserCache {
    authenticated: Cache<CompactString, bool>,
    users: Cache<CompactString, Option<User>>,
}

impl UserCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            authenticated: build(config),
            users: build(config),
        }
    }

    /// Whether this credential pair already passed a token exchange.
    ///
    /// A password changed or revoked since then is not noticed.
    pub fn is_authenticated(&self, login: &str, password: &str) -> bool {
        self.authenticated
            .get(&credential_key(login, password))
            .unwrap_or(false)
    }

    pub fn mark_authenticated(&self, login: &str, password: &str) {
        self.authenticated.insert(credential_key(login, password), true);
    }

    /// `None` on a miss, `Some(None)` for a memoized absent user
    pub fn user(&self, login: &str) -> Option<Option<User>> {
        self.users.get(login)
    }

    pub fn insert_user(&self, login: &str, user: Option<User>) {
        self.users.insert(login.into(), user);
    }

    pub fn invalidate_user(&self, login: &str) {
        self.users.invalidate(login);
    }

    pub fn clear(&self) {
        self.authenticated.invalidate_all();
        self.users.invalidate_all();
    }
}

impl std::fmt::Debug for UserCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCache")
            .field("users", &self.users.entry_count())
            .finish_non_exhaustive()
    }
}

fn build<V>(config: &CacheConfig) -> Cache<CompactString, V>
where
    V: Clone + Send + Sync + 'static,
{
    let mut builder = Cache::<CompactString, V>::builder();
    if let Some(max_entries) = config.max_entries {
        builder = builder.max_capacity(max_entries);
    }
    if let Some(ttl) = config.time_to_live {
        builder = builder.time_to_live(ttl);
    }
    builder.build()
}

fn credential_key(login: &str, password: &str) -> CompactString {
    format_compact!("{login}{CREDENTIAL_DELIMITER}{password}")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::UserDto;

    fn user(login: &str) -> User {
        User::from(UserDto { username: login.into(), ..Default::default() })
    }

    #[test]
    fn test_credentials_are_matched_exactly() {
        let cache = UserCache::new(&CacheConfig::unbounded());
        assert!(!cache.is_authenticated("alice", "pw"));

        cache.mark_authenticated("alice", "pw");
        assert!(cache.is_authenticated("alice", "pw"));
        assert!(!cache.is_authenticated("alice", "other"));
        assert!(!cache.is_authenticated("alicep", "w"));
    }

    #[test]
    fn test_absent_users_are_memoized() {
        let cache = UserCache::new(&CacheConfig::unbounded());
        assert_eq!(cache.user("ghost"), None);

        cache.insert_user("ghost", None);
        assert_eq!(cache.user("ghost"), Some(None));

        cache.insert_user("alice", Some(user("alice")));
        assert_eq!(cache.user("alice"), Some(Some(user("alice"))));

        cache.invalidate_user("alice");
        assert_eq!(cache.user("alice"), None);
    }

    #[test]
    fn test_clear() {
        let cache = UserCache::new(&CacheConfig::unbounded());
        cache.mark_authenticated("alice", "pw");
        cache.insert_user("alice", Some(user("alice")));

        cache.clear();
        assert!(!cache.is_authenticated("alice", "pw"));
        assert_eq!(cache.user("alice"), None);
    }

    #[test]
    fn test_time_to_live_expires_entries() {
        let config = CacheConfig::unbounded().with_time_to_live(Duration::from_millis(50));
        let cache = UserCache::new(&config);
        cache.insert_user("alice", Some(user("alice")));
        assert!(cache.user("alice").is_some());

        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.user("alice"), None);
    }
}
