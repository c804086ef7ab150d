//! GitLab client modules
//!
//! The HTTP layer (`api`), its error translation (`error`), the memo caches
//! (`cache`) and the user service built on top of them (`service`).

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod service;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use api::GitlabApi;
pub use cache::UserCache;
pub use config::{CacheConfig, ClientConfig};
pub use error::{ApiFailure, ClientError, ErrorKind};
pub use service::GitlabUserService;

pub type Result<T> = std::result::Result<T, ClientError>;
