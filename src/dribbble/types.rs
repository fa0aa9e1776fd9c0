use serde::{Deserialize, Serialize};

/// Token endpoint response. Dribbble also returns `token_type` and `scope`,
/// only the access token is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// OAuth error body returned by the token endpoint on failure
#[derive(Debug, Deserialize)]
pub struct OAuthErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// API error body (`{"message": "..."}`) returned by `/v2` endpoints
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}

/// Authenticated user, as returned by `GET /v2/user`
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub html_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Profile shown in the gallery header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            profile_url: user.html_url,
            name: user.name,
            login: user.login,
            avatar_url: user.avatar_url,
        }
    }
}

/// Image variants attached to a shot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotImages {
    #[serde(default)]
    pub hidpi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaser: Option<String>,
}

impl ShotImages {
    /// Largest available image; hidpi is null for shots uploaded below 2x size
    pub fn best(&self) -> Option<&str> {
        self.hidpi
            .as_deref()
            .or(self.normal.as_deref())
            .or(self.teaser.as_deref())
    }
}

/// A Dribbble shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(rename(deserialize = "html_url", serialize = "htmlUrl"))]
    pub html_url: String,
    #[serde(default)]
    pub images: ShotImages,
}

/// One page of shots plus the pagination signal from its `Link` header
#[derive(Debug, Clone, PartialEq)]
pub struct ShotPage {
    pub shots: Vec<Shot>,
    pub has_next_page: bool,
}
