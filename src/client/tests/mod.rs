//! Test utilities and common test fixtures for client modules


use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::client::config::ClientConfig;

/// Create JSON representation of a full GitLab user record
pub fn user_json(id: u64, username: &str) -> serde_json::Value {
    json!({
        "id": id,
        "username": username,
        "name": format!("{username} Example"),
        "state": "active",
        "email": format!("{username}@example.com"),
        "avatar_url": format!("https://gitlab.example.com/uploads/{username}.png"),
        "web_url": format!("https://gitlab.example.com/{username}"),
        "created_at": "2023-01-01T00:00:00.000Z"
    })
}

/// Create JSON representation of a `GET /users?username=` result
pub fn user_search_json(id: u64, username: &str) -> serde_json::Value {
    json!([{
        "id": id,
        "username": username,
        "name": format!("{username} Example"),
        "state": "active",
        "web_url": format!("https://gitlab.example.com/{username}")
    }])
}

/// Create GitLab API error response
pub fn gitlab_error_response(error: &str, description: Option<&str>) -> serde_json::Value {
    let mut json = json!({
        "error": error
    });

    if let Some(desc) = description {
        json["error_description"] = json!(desc);
    }

    json
}

/// Create GitLab API error response (format 2)
pub fn gitlab_error_response_2(message: &str) -> serde_json::Value {
    json!({
        "message": message
    })
}

/// Mock HTTP server for testing
pub struct MockServer {
    pub server: wiremock::MockServer,
}

impl MockServer {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = wiremock::MockServer::start().await;
        Self { server }
    }

    /// Get the base URL of the mock server
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Create a test config pointing to this mock server
    pub fn test_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url(), "test-token")
    }

    /// Mount the username lookup and by-id endpoints for one user,
    /// each expected to be hit exactly once
    pub async fn mount_user(&self, id: u64, username: &str) {
        Mock::given(method("GET"))
            .and(path("/api/v4/users"))
            .and(query_param("username", username))
            .and(header("private-token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_search_json(id, username)))
            .expect(1)
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/v4/users/{id}")))
            .and(header("private-token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(id, username)))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mount a username lookup that matches nobody
    pub async fn mount_unknown_user(&self, username: &str, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/api/v4/users"))
            .and(query_param("username", username))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }
}

#[allow(clippy::module_inception)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shapes() {
        let user = user_json(1, "alice");
        assert_eq!(user["username"], "alice");
        assert!(user.get("is_admin").is_none());

        let search = user_search_json(1, "alice");
        assert_eq!(search[0]["id"], 1);
    }

    #[test]
    fn test_error_responses() {
        let error1 = gitlab_error_response("invalid_grant", Some("Invalid credentials"));
        assert_eq!(error1["error"], "invalid_grant");
        assert_eq!(error1["error_description"], "Invalid credentials");

        let error2 = gitlab_error_response_2("500 Internal Server Error");
        assert_eq!(error2["message"], "500 Internal Server Error");
    }
}
