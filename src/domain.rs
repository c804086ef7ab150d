// GitLab Users API: https://docs.gitlab.com/ee/api/users.html
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Provider-neutral user, as exposed by every `UserService`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: CompactString,
    pub email: CompactString,
    pub name: CompactString,
    pub html_url: CompactString,
    pub avatar_url: CompactString,
    /// No instant-messaging integration exists; always empty.
    pub im_url: CompactString,
    pub site_admin: bool,
    /// Provider record the user was built from, kept for diagnostics
    #[serde(rename = "_raw", default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// Entry of `GET /users?username=`; only the id is needed
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummaryDto {
    pub id: UserId,
    pub username: CompactString,
}

/// Full user record from `GET /users/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDto {
    pub id: UserId,
    pub username: CompactString,
    #[serde(default)]
    pub email: Option<CompactString>,
    #[serde(default)]
    pub name: CompactString,
    #[serde(default)]
    pub web_url: CompactString,
    #[serde(default)]
    pub avatar_url: Option<CompactString>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl User {
    /// Maps a provider record onto the neutral shape. Absence propagates.
    pub fn from_provider(record: Option<UserDto>) -> Option<User> {
        record.map(User::from)
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            login: dto.username,
            email: dto.email.unwrap_or_default(),
            name: dto.name,
            html_url: dto.web_url,
            avatar_url: dto.avatar_url.unwrap_or_default(),
            im_url: CompactString::default(),
            site_admin: dto.is_admin.unwrap_or(false),
            raw: None,
        }
    }
}
