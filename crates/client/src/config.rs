//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VETRINA_API_URL` - Backend base URL (default: `http://localhost:8080`)
//! - `VETRINA_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `VETRINA_USERNAME` - Username used by the CLI to sign in
//! - `VETRINA_PASSWORD` - Password used by the CLI to sign in
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, always ending in `/`
    pub api_url: Url,
    /// Timeout applied to every request except the inventory feed
    pub timeout: Duration,
    /// Stored credentials, if both username and password are set
    pub credentials: Option<Credentials>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

/// Username and password for non-interactive sign-in.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_env_or_default("VETRINA_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("VETRINA_API_URL".to_string(), e))?;

        let timeout_secs = get_env_or_default("VETRINA_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VETRINA_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let credentials = match (
            get_optional_env("VETRINA_USERNAME"),
            get_optional_env("VETRINA_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(Credentials {
                username,
                password: SecretString::from(password),
            }),
            _ => None,
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            credentials,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration pointing at `api_url` with defaults everywhere else.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse.
    pub fn for_url(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("VETRINA_API_URL".to_string(), e))?;
        Ok(Self {
            api_url,
            timeout: Duration::from_secs(30),
            credentials: None,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }

    /// Stored credentials, or an error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when no credentials were set.
    pub fn require_credentials(&self) -> Result<&Credentials, ConfigError> {
        self.credentials.as_ref().ok_or_else(|| {
            let missing = if get_optional_env("VETRINA_USERNAME").is_none() {
                "VETRINA_USERNAME"
            } else {
                "VETRINA_PASSWORD"
            };
            ConfigError::MissingEnvVar(missing.to_string())
        })
    }
}

/// Parse a base URL and make sure it ends with `/` so relative joins keep
/// any path prefix.
fn parse_api_url(raw: &str) -> Result<Url, String> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("not a base URL: {trimmed}"));
    }
    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
