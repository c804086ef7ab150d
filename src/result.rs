use compact_str::CompactString;
use thiserror::Error;

use crate::client::ClientError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failure reading configuration file: {0}")]
    ConfigError(CompactString),

    #[error("Configuration is incomplete: {0}")]
    MissingConfig(&'static str),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    GeneralError(CompactString),
}
