//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_COOKIE_SECRET` - Cookie signing secret (min 32 chars, high entropy)
//! - `BIGCOMMERCE_STORE_HASH` - Store hash (the `abc123` in `store-abc123`)
//! - `BIGCOMMERCE_CUSTOMER_IMPERSONATION_TOKEN` - Storefront API impersonation token
//! - `BIGCOMMERCE_ACCESS_TOKEN` - Management REST API access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_REVALIDATE_SECONDS` - Shared cache lifetime for public reads (default: 3600)
//! - `BIGCOMMERCE_CHANNEL_ID` - Channel id (default: 1)
//! - `BIGCOMMERCE_GRAPHQL_DOMAIN` - Storefront API domain (default: mybigcommerce.com)
//! - `BIGCOMMERCE_API_HOST` - Management API host (default: api.bigcommerce.com)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_COOKIE_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Secret the signed `customer` cookie key is derived from
    pub cookie_secret: SecretString,
    /// How long public (non-customer) reads may be served from cache
    pub revalidate: Duration,
    /// BigCommerce API configuration
    pub bigcommerce: BigCommerceConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// BigCommerce Storefront and management API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct BigCommerceConfig {
    /// Store hash
    pub store_hash: String,
    /// Channel the storefront sells through
    pub channel_id: u32,
    /// Customer impersonation token for the GraphQL Storefront API
    pub customer_impersonation_token: SecretString,
    /// Access token for the REST management API
    pub access_token: SecretString,
    /// Domain hosting the GraphQL Storefront API
    pub graphql_domain: String,
    /// Host of the REST management API
    pub api_host: String,
}

impl std::fmt::Debug for BigCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BigCommerceConfig")
            .field("store_hash", &self.store_hash)
            .field("channel_id", &self.channel_id)
            .field("customer_impersonation_token", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("graphql_domain", &self.graphql_domain)
            .field("api_host", &self.api_host)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;
        let cookie_secret = get_validated_secret("STOREFRONT_COOKIE_SECRET")?;
        validate_cookie_secret(&cookie_secret, "STOREFRONT_COOKIE_SECRET")?;
        let revalidate = Duration::from_secs(parse_env("STOREFRONT_REVALIDATE_SECONDS", "3600")?);

        let bigcommerce = BigCommerceConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            cookie_secret,
            revalidate,
            bigcommerce,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl BigCommerceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store_hash: get_required_env("BIGCOMMERCE_STORE_HASH")?,
            channel_id: parse_env("BIGCOMMERCE_CHANNEL_ID", "1")?,
            customer_impersonation_token: get_validated_secret(
                "BIGCOMMERCE_CUSTOMER_IMPERSONATION_TOKEN",
            )?,
            access_token: get_validated_secret("BIGCOMMERCE_ACCESS_TOKEN")?,
            graphql_domain: get_env_or_default("BIGCOMMERCE_GRAPHQL_DOMAIN", "mybigcommerce.com"),
            api_host: get_env_or_default("BIGCOMMERCE_API_HOST", "api.bigcommerce.com"),
        })
    }

    /// GraphQL Storefront API endpoint for this store and channel.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "https://store-{}-{}.{}/graphql",
            self.store_hash, self.channel_id, self.graphql_domain
        )
    }

    /// Base URL of the REST management API for this store.
    #[must_use]
    pub fn rest_base_url(&self) -> String {
        format!("https://{}/stores/{}", self.api_host, self.store_hash)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a cookie secret meets minimum length requirements.
fn validate_cookie_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_COOKIE_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_COOKIE_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // API tokens and generated secrets sit well above this
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bigcommerce_config() -> BigCommerceConfig {
        BigCommerceConfig {
            store_hash: "abc123".to_string(),
            channel_id: 1,
            customer_impersonation_token: SecretString::from("super_secret_impersonation"),
            access_token: SecretString::from("super_secret_access"),
            graphql_domain: "mybigcommerce.com".to_string(),
            api_host: "api.bigcommerce.com".to_string(),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let err = validate_secret_strength("your-api-key-here", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_cookie_secret_length() {
        assert!(validate_cookie_secret(&SecretString::from("short"), "TEST").is_err());
        assert!(validate_cookie_secret(&SecretString::from("a".repeat(32)), "TEST").is_ok());
    }

    #[test]
    fn test_endpoints() {
        let config = bigcommerce_config();
        assert_eq!(
            config.graphql_endpoint(),
            "https://store-abc123-1.mybigcommerce.com/graphql"
        );
        assert_eq!(
            config.rest_base_url(),
            "https://api.bigcommerce.com/stores/abc123"
        );
    }

    #[test]
    fn test_socket_addr_and_secure_cookies() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "https://shop.example".to_string(),
            cookie_secret: SecretString::from("x".repeat(32)),
            revalidate: Duration::from_secs(3600),
            bigcommerce: bigcommerce_config(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_bigcommerce_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", bigcommerce_config());

        assert!(debug_output.contains("abc123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_impersonation"));
        assert!(!debug_output.contains("super_secret_access"));
    }
}
