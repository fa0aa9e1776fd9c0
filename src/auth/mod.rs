pub mod cookie_cipher;
pub mod exchange;
pub mod token_cookie;

pub use cookie_cipher::{CookieCipher, CookieError};
pub use exchange::{exchange_token, ExchangeError, TokenExchangeResponse, TokenRequest};
pub use token_cookie::{TokenCookie, TOKEN_COOKIE_NAME, TOKEN_MAX_AGE_SECS};
