//! Web application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STRAPI_URL` - Content API base URL (default: `http://localhost:1337`)
//! - `STRAPI_API_TOKEN` - Content API token, sent as a bearer token
//! - `ROLODEX_HOST` - Bind address (default: 127.0.0.1)
//! - `ROLODEX_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Content API base URL used when `STRAPI_URL` is unset.
pub const DEFAULT_STRAPI_URL: &str = "http://localhost:1337";

/// Strapi generates API tokens as 256 hex characters. Anything much shorter
/// was truncated while copying.
const MIN_API_TOKEN_LENGTH: usize = 64;

/// Values left over from `.env` templates.
const PLACEHOLDER_TOKENS: &[&str] = &["changeme", "your-api-token", "<token>", "placeholder"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Content API configuration
    pub strapi: StrapiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// Content API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct StrapiConfig {
    /// Base URL, without the `/api` prefix
    pub base_url: Url,
    /// Optional API token
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for StrapiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrapiConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl StrapiConfig {
    /// Configuration for an unauthenticated content API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("STRAPI_URL", base_url)?,
            api_token: None,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("STRAPI_URL", DEFAULT_STRAPI_URL);
        let api_token = get_optional_env("STRAPI_API_TOKEN")
            .map(|token| {
                validate_api_token(&token)?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        Ok(Self {
            base_url: parse_base_url("STRAPI_URL", &base_url)?,
            api_token,
        })
    }

    /// Returns the contacts collection endpoint, e.g. `http://localhost:1337/api/contacts`.
    #[must_use]
    pub fn contacts_endpoint(&self) -> String {
        format!(
            "{}/api/contacts",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if the API token
    /// looks truncated or unfilled.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ROLODEX_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROLODEX_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ROLODEX_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ROLODEX_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            strapi: StrapiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute http(s) base URL.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Reject API tokens that cannot be what the Strapi admin panel issued.
fn validate_api_token(token: &str) -> Result<(), ConfigError> {
    const VAR: &str = "STRAPI_API_TOKEN";

    if token.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidEnvVar(
            VAR.to_string(),
            "contains whitespace".to_string(),
        ));
    }

    let lower = token.to_ascii_lowercase();
    if PLACEHOLDER_TOKENS.iter().any(|placeholder| lower.contains(placeholder)) {
        return Err(ConfigError::InsecureSecret(
            VAR.to_string(),
            "still set to a template placeholder".to_string(),
        ));
    }

    let length = token.chars().count();
    if length < MIN_API_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            VAR.to_string(),
            format!(
                "only {length} characters, expected at least {MIN_API_TOKEN_LENGTH}. Copy the full token from Settings > API Tokens."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issued_token() -> String {
        "0123456789abcdef".repeat(16)
    }

    #[test]
    fn test_validate_api_token_accepts_issued_token() {
        assert!(validate_api_token(&issued_token()).is_ok());
    }

    #[test]
    fn test_validate_api_token_rejects_placeholder() {
        let result = validate_api_token("your-api-token");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_api_token_rejects_truncated_token() {
        let token = issued_token();
        let result = validate_api_token(&token[..40]);
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_api_token_rejects_whitespace() {
        let token = format!("{} ", issued_token());
        let result = validate_api_token(&token);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_base_url() {
        assert!(parse_base_url("STRAPI_URL", "http://localhost:1337").is_ok());
        assert!(parse_base_url("STRAPI_URL", "localhost:1337").is_err());
        assert!(parse_base_url("STRAPI_URL", "ftp://cms.internal").is_err());
        assert!(parse_base_url("STRAPI_URL", "/api").is_err());
    }

    #[test]
    fn test_contacts_endpoint_strips_trailing_slash() {
        let config = StrapiConfig::new("http://localhost:1337").unwrap();
        assert_eq!(config.contacts_endpoint(), "http://localhost:1337/api/contacts");

        let config = StrapiConfig::new("https://cms.example.org/strapi/").unwrap();
        assert_eq!(
            config.contacts_endpoint(),
            "https://cms.example.org/strapi/api/contacts"
        );
    }

    #[test]
    fn test_socket_addr() {
        let config = WebConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            strapi: StrapiConfig::new(DEFAULT_STRAPI_URL).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_strapi_config_debug_redacts_token() {
        let config = StrapiConfig {
            base_url: Url::parse("http://localhost:1337").unwrap(),
            api_token: Some(SecretString::from("super_secret_api_token")),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:1337"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_token"));
    }
}
