use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Dribbble web endpoints (authorize + token)
pub const DEFAULT_AUTH_BASE: &str = "https://dribbble.com";

/// Dribbble REST API
pub const DEFAULT_API_BASE: &str = "https://api.dribbble.com";

/// Shots per page when nothing else is configured
pub const DEFAULT_PER_PAGE: u32 = 2;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),

    #[error("Configuration file not found at {path}: {reason}")]
    FileNotFound { path: String, reason: String },

    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    #[error("Invalid cookie key: {0}")]
    InvalidCookieKey(String),

    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: String, value: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::error::Error),
}

/// Configuration file format (for deserialization)
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    per_page: Option<u32>,
    #[serde(default)]
    cookie_key: Option<String>,
    #[serde(default)]
    cookie_secure: Option<bool>,
    #[serde(default)]
    auth_base: Option<String>,
    #[serde(default)]
    api_base: Option<String>,
}

/// Configuration for the gallery server
#[derive(Debug, Clone)]
pub struct Config {
    /// Dribbble OAuth2 client ID
    pub client_id: String,

    /// Dribbble OAuth2 client secret (server-side only)
    pub client_secret: String,

    /// HTTP listen port
    pub port: u16,

    /// Shots requested per page
    pub per_page: u32,

    /// AES-256-GCM key for sealing the token cookie; plaintext cookie when absent
    pub cookie_key: Option<[u8; 32]>,

    /// Adds the `Secure` attribute to the token cookie
    pub cookie_secure: bool,

    /// Base URL for `/oauth/authorize` and `/oauth/token`
    pub auth_base: String,

    /// Base URL for `/v2/...` API calls
    pub api_base: String,
}

impl Config {
    /// Config with the provider defaults; used by tests and as a starting point
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            port: DEFAULT_PORT,
            per_page: DEFAULT_PER_PAGE,
            cookie_key: None,
            cookie_secure: false,
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Load configuration from environment variables, falling back to the config file
    pub fn from_env_or_file() -> Result<Self, ConfigError> {
        match Self::from_env() {
            Ok(config) => Ok(config),
            Err(ConfigError::MissingVar(var)) => {
                tracing::debug!(missing = %var, "Environment incomplete, trying config file");
                Self::from_file()
            }
            Err(e) => Err(e),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = require_var("DRIBBBLE_CLIENT_ID")?;
        let client_secret = require_var("DRIBBBLE_CLIENT_SECRET")?;

        let mut config = Config::new(client_id, client_secret);

        if let Some(port) = optional_var("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        if let Some(per_page) = optional_var("PER_PAGE") {
            config.per_page = parse_per_page(&per_page)?;
        }
        if let Some(key) = optional_var("COOKIE_KEY") {
            config.cookie_key = Some(Self::parse_cookie_key(&key)?);
        }
        if let Some(secure) = optional_var("COOKIE_SECURE") {
            config.cookie_secure = matches!(secure.trim(), "1" | "true" | "TRUE" | "yes");
        }
        if let Some(base) = optional_var("DRIBBBLE_AUTH_BASE") {
            config.auth_base = validate_base(&base)?;
        }
        if let Some(base) = optional_var("DRIBBBLE_API_BASE") {
            config.api_base = validate_base(&base)?;
        }

        Ok(config)
    }

    /// Load configuration from ~/.config/dribbble-gallery/config.json
    pub fn from_file() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path()?;

        let contents = fs::read_to_string(&config_path).map_err(|e| ConfigError::FileNotFound {
            path: config_path.display().to_string(),
            reason: format!(
                "{}. Either export DRIBBBLE_CLIENT_ID and DRIBBBLE_CLIENT_SECRET, or create:\n\
                     mkdir -p ~/.config/dribbble-gallery\n\
                     $EDITOR ~/.config/dribbble-gallery/config.json",
                e
            ),
        })?;

        Self::from_json(&contents)
    }

    fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(contents)?;

        let mut config = Config::new(file.client_id, file.client_secret);
        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(per_page) = file.per_page {
            if per_page == 0 {
                return Err(ConfigError::ParseError("per_page must be at least 1".to_string()));
            }
            config.per_page = per_page;
        }
        if let Some(key) = file.cookie_key {
            config.cookie_key = Some(Self::parse_cookie_key(&key)?);
        }
        config.cookie_secure = file.cookie_secure.unwrap_or(false);
        if let Some(base) = file.auth_base {
            config.auth_base = validate_base(&base)?;
        }
        if let Some(base) = file.api_base {
            config.api_base = validate_base(&base)?;
        }

        Ok(config)
    }

    fn get_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::home_dir()
            .map(|home| home.join(".config/dribbble-gallery"))
            .ok_or_else(|| ConfigError::FileNotFound {
                path: "~/.config/dribbble-gallery/config.json".to_string(),
                reason: "Could not determine home directory".to_string(),
            })?;

        Ok(config_dir.join("config.json"))
    }

    /// Parse cookie key from hex string (must be 32 bytes)
    fn parse_cookie_key(hex_str: &str) -> Result<[u8; 32], ConfigError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| ConfigError::InvalidCookieKey(format!("Invalid hex: {}", e)))?;

        if bytes.len() != 32 {
            return Err(ConfigError::InvalidCookieKey(format!(
                "Expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(key)
    }
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    optional_var(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name: name.to_string(),
        value: value.to_string(),
    })
}

fn parse_per_page(value: &str) -> Result<u32, ConfigError> {
    let per_page: u32 = parse_number("PER_PAGE", value)?;
    if per_page == 0 {
        return Err(ConfigError::InvalidNumber {
            name: "PER_PAGE".to_string(),
            value: value.to_string(),
        });
    }
    Ok(per_page)
}

/// Validate a base URL and strip the trailing slash so paths can be appended
fn validate_base(base: &str) -> Result<String, ConfigError> {
    let _ = url::Url::parse(base.trim())?;
    Ok(base.trim().trim_end_matches('/').to_string())
}
