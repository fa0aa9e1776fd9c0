use super::cookie_cipher::{CookieCipher, CookieError};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Name of the cookie carrying the Dribbble access token
pub const TOKEN_COOKIE_NAME: &str = "accessToken";

/// Token lifetime: 24 hours from issuance
pub const TOKEN_MAX_AGE_SECS: i64 = 24 * 60 * 60;

/// Payload stored in the cookie when sealing is enabled
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SealedToken {
    access_token: String,
    issued_at: DateTime<Utc>,
}

impl SealedToken {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at >= Duration::seconds(TOKEN_MAX_AGE_SECS)
    }
}

/// Reads and writes the session token cookie on an explicit cookie jar.
///
/// With a cipher the value is sealed and carries its issue time, so a cookie
/// replayed past its 24 hours is refused even if the browser kept it. Without
/// one the token is stored as-is.
#[derive(Clone)]
pub struct TokenCookie {
    cipher: Option<CookieCipher>,
    secure: bool,
}

impl TokenCookie {
    pub fn new(key: Option<&[u8; 32]>, secure: bool) -> Self {
        Self {
            cipher: key.map(CookieCipher::new),
            secure,
        }
    }

    /// Current session token, if the jar holds a usable one
    pub fn read(&self, jar: &CookieJar) -> Option<String> {
        let value = jar.get(TOKEN_COOKIE_NAME)?.value().trim().to_string();
        if value.is_empty() {
            return None;
        }

        let Some(cipher) = &self.cipher else {
            return Some(value);
        };

        match cipher.open::<SealedToken>(&value) {
            Ok(sealed) if sealed.is_expired(Utc::now()) => {
                debug!(issued_at = %sealed.issued_at, "Token cookie expired");
                None
            }
            Ok(sealed) => Some(sealed.access_token),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable token cookie");
                None
            }
        }
    }

    /// Add the token cookie (24h, site-wide) to the jar
    pub fn store(&self, jar: CookieJar, access_token: &str) -> Result<CookieJar, CookieError> {
        let value = match &self.cipher {
            Some(cipher) => cipher.seal(&SealedToken {
                access_token: access_token.to_string(),
                issued_at: Utc::now(),
            })?,
            None => access_token.to_string(),
        };

        let cookie = Cookie::build((TOKEN_COOKIE_NAME, value))
            .path("/")
            .max_age(cookie::time::Duration::seconds(TOKEN_MAX_AGE_SECS))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);

        Ok(jar.add(cookie))
    }

    /// Queue removal of the token cookie
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(TOKEN_COOKIE_NAME).path("/"))
    }
}
