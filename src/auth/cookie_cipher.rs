use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Cookie sealing errors
#[derive(Error, Debug)]
pub enum CookieError {
    #[error("Failed to serialize cookie data: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to encrypt cookie: {0}")]
    EncryptionError(String),

    #[error("Failed to decrypt cookie: {0}")]
    DecryptionError(String),

    #[error("Invalid cookie format: {0}")]
    InvalidFormat(String),

    #[error("Failed to decode base64: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

/// Seals cookie payloads with AES-256-GCM.
///
/// Wire format: base64url(`nonce || ciphertext || tag`), no padding, so the
/// value is a valid cookie-octet string.
#[derive(Clone)]
pub struct CookieCipher {
    cipher: Aes256Gcm,
}

impl CookieCipher {
    /// Cipher for the configured `COOKIE_KEY`
    ///
    /// # Arguments
    /// * `key` - 32-byte AES-256-GCM key, decoded from 64 hex characters
    ///
    /// # Security
    /// Every server sharing sessions needs the same key. Rotating it
    /// invalidates all outstanding token cookies.
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
        }
    }

    /// Seal a payload into a cookie value
    ///
    /// # Arguments
    /// * `data` - Payload, serialized to JSON before encryption
    ///
    /// # Returns
    /// base64url(`nonce || ciphertext || tag`) without padding
    ///
    /// # Errors
    /// Returns error if the payload cannot be serialized or encryption fails
    ///
    /// # Security
    /// A fresh random 12-byte nonce is drawn per call, so sealing the same
    /// token twice yields different values. The GCM tag rejects any edit to
    /// the cookie.
    pub fn seal<T: Serialize>(&self, data: &T) -> Result<String, CookieError> {
        let plaintext = serde_json::to_vec(data)?;

        let nonce_bytes: [u8; NONCE_LEN] = rand::thread_rng().gen();
        let nonce = Nonce::from(nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_ref())
            .map_err(|e| CookieError::EncryptionError(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Open a cookie value produced by [`CookieCipher::seal`]
    ///
    /// # Arguments
    /// * `sealed_b64` - Raw cookie value
    ///
    /// # Errors
    /// Returns error if:
    /// - the value is not base64url
    /// - it is shorter than nonce plus tag
    /// - the key differs or the value was tampered with
    /// - the decrypted bytes are not the expected JSON
    ///
    /// # Security
    /// A plaintext token left over from before a key was configured fails
    /// here and is treated as no session.
    pub fn open<T: DeserializeOwned>(&self, sealed_b64: &str) -> Result<T, CookieError> {
        let sealed = URL_SAFE_NO_PAD.decode(sealed_b64)?;

        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CookieError::InvalidFormat(format!(
                "Cookie too short: {} bytes (minimum {})",
                sealed.len(),
                NONCE_LEN + TAG_LEN
            )));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| CookieError::DecryptionError(e.to_string()))?;

        Ok(serde_json::from_slice(&plaintext)?)
    }
}
