//! User service adapter for GitLab.
//!
//! Resolves GitLab users by login, verifies credentials through the
//! password grant, and normalizes GitLab's user records into a
//! provider-neutral [`User`].

pub mod client;
pub mod config;
pub mod domain;
pub mod id;
pub mod logging;
pub mod result;
pub mod user_service;

pub use client::{ClientConfig, ClientError, GitlabUserService};
pub use domain::User;
pub use user_service::{SearchOptions, UserService};
