//! Core HTTP client for GitLab API

use chrono::Local;
use compact_str::format_compact;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};

use super::{
    config::ClientConfig,
    error::{ApiFailure, ClientError, Result},
};
use crate::{
    domain::{UserDto, UserSummaryDto},
    id::UserId,
};

pub const API_PREFIX: &str = "/api/v4";
pub const TOKEN_PATH: &str = "/oauth/token/";
pub const PRIVATE_TOKEN_HEADER: &str = "private-token";

/// Pure HTTP client for GitLab API
#[derive(Debug, Clone)]
pub struct GitlabApi {
    client: Client,
    config: ClientConfig,
}

/// Password grant sent to the token endpoint
#[derive(Serialize)]
struct PasswordGrant<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
}

/// Successful response body and the path it came from
#[derive(Debug)]
struct RawResponse {
    path: String,
    body: String,
}

impl GitlabApi {
    /// Create a new GitLab API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request.timeout)
            .build()
            .map_err(|e| ClientError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Exchange a login and password for a token.
    ///
    /// The issued token is discarded; only success matters. `None` when the
    /// token endpoint does not exist.
    #[instrument(skip(self, password))]
    pub async fn request_password_token(&self, login: &str, password: &str) -> Result<Option<()>> {
        let url = format_compact!("{}{}", self.config.root_url(), TOKEN_PATH);
        let grant = PasswordGrant { grant_type: "password", username: login, password };

        // the body carries the issued access token, keep it out of debug logs
        let response = self.execute(self.client.post(url.as_str()).json(&grant), false).await?;
        Ok(response.map(|_| ()))
    }

    /// First user whose username matches `login`
    #[instrument(skip(self))]
    pub async fn find_user_by_username(&self, login: &str) -> Result<Option<UserSummaryDto>> {
        let url = format_compact!("{}{}/users", self.config.root_url(), API_PREFIX);
        let request = self.client.get(url.as_str()).query(&[("username", login)]);

        let matches: Option<Vec<UserSummaryDto>> = self.get_json(request).await?;
        let matches = matches.unwrap_or_default();
        if matches.len() > 1 {
            debug!(match_count = matches.len(), "Ambiguous username lookup, using first match");
        }

        Ok(matches.into_iter().next())
    }

    /// Full user record by id, along with the record as received
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<Option<(UserDto, serde_json::Value)>> {
        let url = format_compact!("{}{}/users/{}", self.config.root_url(), API_PREFIX, id);
        let endpoint = url.to_string();

        let Some(raw) = self.get_json::<serde_json::Value>(self.client.get(url.as_str())).await? else {
            return Ok(None);
        };

        let user = serde_json::from_value(raw.clone())
            .map_err(|e| ClientError::json_parse(endpoint, e))?;
        Ok(Some((user, raw)))
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Private helper methods

    /// Perform authenticated request and deserialize JSON response
    async fn get_json<T>(&self, request: RequestBuilder) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(response) = self.execute(request, true).await? else {
            return Ok(None);
        };

        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ClientError::json_parse(response.path, e))
    }

    /// Send an authenticated request through the error translation
    async fn execute(&self, request: RequestBuilder, log_body: bool) -> Result<Option<RawResponse>> {
        let request = request
            .header(PRIVATE_TOKEN_HEADER, self.config.private_token.as_str())
            .build()
            .map_err(|e| ClientError::from(ApiFailure::from_transport(&e, HeaderMap::new())))?;

        let headers = redacted(request.headers());
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Request to GitLab failed without a response");
                return Err(ApiFailure::from_transport(&e, headers).into());
            },
        };

        let path = response.url().path().to_string();
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from(ApiFailure::from_transport(&e, headers.clone())))?;

        // Log response if debug is enabled
        if log_body && self.config.debug.log_responses {
            self.log_response_to_file(&path, &body);
        }

        Ok(translate(status, headers, body)?.map(|body| RawResponse { path, body }))
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(log_dir) {
                    warn!("Failed to create log directory: {}", e);
                    return;
                }
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S%.3f"),
                path.replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}

/// Maps a response onto the client's error taxonomy.
///
/// Success yields the body, 404 yields `None`, anything else an error
/// classified by status.
pub(crate) fn translate(status: StatusCode, headers: HeaderMap, body: String) -> Result<Option<String>> {
    if status.is_success() {
        Ok(Some(body))
    } else if status == StatusCode::NOT_FOUND {
        debug!("GitLab answered 404, treating as absent");
        Ok(None)
    } else {
        let failure = ApiFailure::from_response(status.as_u16(), headers, &body);
        warn!(status = failure.status, message = %failure.message, "GitLab request failed");
        Err(failure.into())
    }
}

/// Request headers with the private token masked
fn redacted(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();
    if headers.contains_key(PRIVATE_TOKEN_HEADER) {
        headers.insert(PRIVATE_TOKEN_HEADER, HeaderValue::from_static("[redacted]"));
    }
    headers
}
