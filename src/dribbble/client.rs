use crate::config::Config;
use crate::dribbble::pagination::has_next_page;
use crate::dribbble::types::{
    ApiErrorResponse, OAuthErrorResponse, Shot, ShotPage, TokenResponse, User, UserProfile,
};
use reqwest::{header, Client, StatusCode};
use tracing::debug;
use url::Url;

/// Error types for Dribbble API operations
#[derive(Debug, thiserror::Error)]
pub enum DribbbleError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request failed with status code {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Dribbble OAuth error: {error} - {error_description}")]
    OAuthError {
        error: String,
        error_description: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Dribbble OAuth + REST client.
///
/// Holds the application credentials; user tokens are passed per call so a
/// single client is shared by every request.
#[derive(Clone)]
pub struct DribbbleClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    auth_base: String,
    api_base: String,
}

impl DribbbleClient {
    pub fn new(config: &Config) -> Result<Self, DribbbleError> {
        let http_client = Client::builder()
            .user_agent(concat!("dribbble-gallery/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            auth_base: config.auth_base.trim_end_matches('/').to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// URL the browser is sent to in order to grant access
    pub fn authorize_url(&self) -> Result<Url, DribbbleError> {
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.auth_base))?;
        url.query_pairs_mut().append_pair("client_id", &self.client_id);
        Ok(url)
    }

    /// Exchange an authorization code for an access token.
    ///
    /// Dribbble takes the credentials and code as query parameters on a POST
    /// with an empty body.
    pub async fn exchange_code(&self, code: &str) -> Result<String, DribbbleError> {
        let url = format!("{}/oauth/token", self.auth_base);

        debug!("Exchanging authorization code with Dribbble");

        let response = self
            .http_client
            .post(&url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<OAuthErrorResponse>(&body) {
                Ok(err) => DribbbleError::OAuthError {
                    error: err.error,
                    error_description: err
                        .error_description
                        .unwrap_or_else(|| "No description provided".to_string()),
                },
                Err(_) => DribbbleError::ApiError {
                    status: status.as_u16(),
                    message: fallback_message(status, &body),
                },
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetch the authenticated user's profile
    pub async fn get_user(&self, token: &str) -> Result<UserProfile, DribbbleError> {
        let response = self.get(token, "/v2/user", &[]).await?;
        let user: User = response.json().await?;
        Ok(user.into())
    }

    /// Fetch one page of the authenticated user's shots
    pub async fn list_shots(
        &self,
        token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<ShotPage, DribbbleError> {
        let response = self
            .get(
                token,
                "/v2/user/shots",
                &[("page", page.to_string()), ("per_page", per_page.to_string())],
            )
            .await?;

        let has_next_page = has_next_page(
            response
                .headers()
                .get(header::LINK)
                .and_then(|v| v.to_str().ok()),
        );
        let shots: Vec<Shot> = response.json().await?;

        debug!(page, per_page, count = shots.len(), has_next_page, "Fetched shots page");

        Ok(ShotPage {
            shots,
            has_next_page,
        })
    }

    /// Authenticated GET against the API; non-2xx responses become `ApiError`
    async fn get(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, DribbbleError> {
        let url = format!("{}{}", self.api_base, path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| fallback_message(status, &body));

        Err(DribbbleError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.trim().to_string()
    }
}
