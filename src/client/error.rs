//! Error types for GitLab client operations

use compact_str::{format_compact, CompactString};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use thiserror::Error;

/// Status reported when no HTTP response was received
pub const UNKNOWN_STATUS: i32 = -1;

/// Structured error types for GitLab client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// GitLab rejected the request (4xx other than 404)
    #[error("{0}")]
    Client(ApiFailure),

    /// GitLab failed, answered with an unexpected status, or never answered
    #[error("{0}")]
    Server(ApiFailure),

    /// JSON parsing error with endpoint context
    #[error("Failed to parse JSON response from {endpoint}: {source}")]
    JsonParse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration field validation failed
    #[error("Invalid {field}: {message}")]
    ConfigValidation { field: String, message: String },
}

/// Details of a failed GitLab call
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiFailure {
    /// Provider supplied error text, else `status <n>`
    pub message: CompactString,
    /// HTTP status, or [`UNKNOWN_STATUS`]
    pub status: i32,
    /// Headers of the request that failed, private token redacted
    pub headers: HeaderMap,
    /// Raw error payload
    pub raw: serde_json::Value,
}

/// Client vs server classification of a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Client,
    Server,
}

impl ErrorKind {
    pub fn classify(status: i32) -> Self {
        if (400..500).contains(&status) {
            ErrorKind::Client
        } else {
            ErrorKind::Server
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Client => "GitlabClientError",
            ErrorKind::Server => "GitlabServerError",
        }
    }
}

/// GitLab API error response formats
#[derive(Debug, Deserialize)]
struct GitlabApiError {
    error: CompactString,
}

#[derive(Debug, Deserialize)]
struct GitlabApiError2 {
    message: CompactString,
}

impl ApiFailure {
    /// Build a failure from a non-success response body
    pub fn from_response(status: u16, headers: HeaderMap, body: &str) -> Self {
        let raw = serde_json::from_str::<serde_json::Value>(body).unwrap_or_else(|_| {
            if body.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::String(body.to_string())
            }
        });

        let message = if let Ok(api_error) = serde_json::from_value::<GitlabApiError>(raw.clone()) {
            api_error.error
        } else if let Ok(api_error2) = serde_json::from_value::<GitlabApiError2>(raw.clone()) {
            api_error2.message
        } else {
            format_compact!("status {}", status)
        };

        Self { message, status: i32::from(status), headers, raw }
    }

    /// Build a failure for a request that never produced a response
    pub fn from_transport(error: &reqwest::Error, headers: HeaderMap) -> Self {
        let status = error
            .status()
            .map(|s| i32::from(s.as_u16()))
            .unwrap_or(UNKNOWN_STATUS);

        Self {
            message: format_compact!("{}", error),
            status,
            headers,
            raw: serde_json::Value::Null,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::classify(self.status)
    }
}

impl From<ApiFailure> for ClientError {
    fn from(failure: ApiFailure) -> Self {
        match failure.kind() {
            ErrorKind::Client => ClientError::Client(failure),
            ErrorKind::Server => ClientError::Server(failure),
        }
    }
}

impl ClientError {
    /// Create a JSON parsing error with endpoint context
    pub fn json_parse(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse { endpoint: endpoint.into(), source }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a configuration field validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation { field: field.into(), message: message.into() }
    }

    /// The failed call, for errors raised by GitLab itself
    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            ClientError::Client(failure) | ClientError::Server(failure) => Some(failure),
            _ => None,
        }
    }

    /// Client/server classification; local errors have none
    pub fn kind(&self) -> Option<ErrorKind> {
        self.failure().map(ApiFailure::kind)
    }

    /// HTTP status of the failed call, if any
    pub fn status(&self) -> Option<i32> {
        self.failure().map(|f| f.status)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
