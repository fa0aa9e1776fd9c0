use crate::dribbble::{DribbbleClient, DribbbleError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Token exchange failures
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Bad credentials.")]
    MissingCode,

    #[error(transparent)]
    Provider(#[from] DribbbleError),
}

/// Body accepted by `POST /api/token`
#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub code: Option<String>,
}

impl TokenRequest {
    /// Lenient parse: an empty or malformed body is treated as a missing code
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }
}

/// Reply of `POST /api/token`; errors travel in the payload, never the status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExchangeResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
}

impl TokenExchangeResponse {
    pub fn from_result(result: &Result<String, ExchangeError>) -> Self {
        match result {
            Ok(token) => Self {
                access_token: Some(token.clone()),
                error: None,
            },
            Err(e) => Self {
                access_token: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Trade an authorization code for an access token.
///
/// The client secret stays inside `DribbbleClient`; nothing returned here
/// carries it.
pub async fn exchange_token(
    client: &DribbbleClient,
    code: Option<&str>,
) -> Result<String, ExchangeError> {
    let code = code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(ExchangeError::MissingCode)?;

    match client.exchange_code(code).await {
        Ok(token) => {
            info!("Authorization code exchanged for access token");
            Ok(token)
        }
        Err(e) => {
            warn!(error = %e, "Token exchange with Dribbble failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_code_message() {
        assert_eq!(ExchangeError::MissingCode.to_string(), "Bad credentials.");
    }

    #[test]
    fn test_token_request_from_body() {
        assert_eq!(
            TokenRequest::from_body(br#"{"code": "XYZ"}"#).code.as_deref(),
            Some("XYZ")
        );
        assert!(TokenRequest::from_body(b"").code.is_none());
        assert!(TokenRequest::from_body(b"code=XYZ").code.is_none());
        assert!(TokenRequest::from_body(br#"{"state": "s"}"#).code.is_none());
    }

    #[test]
    fn test_response_serialization() {
        let ok = TokenExchangeResponse::from_result(&Ok("T".to_string()));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"accessToken": "T", "error": null})
        );

        let err = TokenExchangeResponse::from_result(&Err(ExchangeError::MissingCode));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({"accessToken": null, "error": "Bad credentials."})
        );
    }

    #[tokio::test]
    async fn test_blank_code_never_reaches_provider() {
        let mut config = crate::config::Config::new("id", "secret");
        // unroutable: any request would fail with an HTTP error instead
        config.auth_base = "http://127.0.0.1:1".to_string();
        let client = DribbbleClient::new(&config).unwrap();

        let result = exchange_token(&client, Some("   ")).await;
        assert!(matches!(result, Err(ExchangeError::MissingCode)));

        let result = exchange_token(&client, None).await;
        assert!(matches!(result, Err(ExchangeError::MissingCode)));
    }
}
