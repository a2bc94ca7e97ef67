//! Payment relay configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SQUARE_ACCESS_TOKEN` - Square API access token (high entropy, not a placeholder)
//! - `SQUARE_LOCATION_ID` - Square location payments are taken for
//!
//! ## Optional
//! - `SQUARE_ENVIRONMENT` - `production` (default) or `sandbox`
//! - `WEBSITE_URL` - Origin allowed by CORS (default: any origin)
//! - `TRUST_PROXY_HEADERS` - `true` to rate limit on `X-Forwarded-For` /
//!   `X-Real-IP` set by a proxy in front of the relay (default: `false`)
//! - `SQUARE_TIMEOUT_SECS` - Limit on each Square API request (default: 30)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3001)
//! - `APP_ENV` - `production` (default) or `development`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
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

/// Deployment mode. Development responses carry internal error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Production,
    Development,
}

impl FromStr for AppEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("expected production or development, got {other:?}")),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Production => "production",
            Self::Development => "development",
        })
    }
}

/// Which Square deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquareEnvironment {
    #[default]
    Production,
    Sandbox,
}

impl SquareEnvironment {
    /// REST API base URL.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Production => "https://connect.squareup.com",
            Self::Sandbox => "https://connect.squareupsandbox.com",
        }
    }
}

impl FromStr for SquareEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            other => Err(format!("expected production or sandbox, got {other:?}")),
        }
    }
}

/// Payment relay configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Square API configuration
    pub square: SquareConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Origin allowed by CORS; `None` allows any origin
    pub allowed_origin: Option<HeaderValue>,
    /// Key rate limits on proxy forwarding headers instead of the peer
    pub trust_proxy_headers: bool,
    pub environment: AppEnvironment,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
}

/// Square API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct SquareConfig {
    pub access_token: SecretString,
    pub location_id: String,
    pub environment: SquareEnvironment,
    /// Limit on each API request
    pub timeout: Duration,
}

impl fmt::Debug for SquareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SquareConfig")
            .field("access_token", &"[REDACTED]")
            .field("location_id", &self.location_id)
            .field("environment", &self.environment)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(&Vars::from_env())
    }

    fn from_vars(vars: &Vars) -> Result<Self, ConfigError> {
        let host = vars.parsed_or("HOST", "0.0.0.0")?;
        let port = vars.parsed_or("PORT", "3001")?;

        let allowed_origin = vars
            .optional("WEBSITE_URL")
            .filter(|origin| origin != "*")
            .map(|origin| {
                HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|e| {
                    ConfigError::InvalidEnvVar("WEBSITE_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            square: SquareConfig::from_vars(vars)?,
            host,
            port,
            allowed_origin,
            trust_proxy_headers: vars.parsed_or("TRUST_PROXY_HEADERS", "false")?,
            environment: vars.parsed_or("APP_ENV", "production")?,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SquareConfig {
    fn from_vars(vars: &Vars) -> Result<Self, ConfigError> {
        let timeout_secs: u64 = vars.parsed_or("SQUARE_TIMEOUT_SECS", "30")?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SQUARE_TIMEOUT_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            access_token: vars.validated_secret("SQUARE_ACCESS_TOKEN")?,
            location_id: vars.required("SQUARE_LOCATION_ID")?,
            environment: vars.parsed_or("SQUARE_ENVIRONMENT", "production")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Snapshot of the variables this module reads. Blank values count as unset.
struct Vars(HashMap<String, String>);

impl Vars {
    fn from_env() -> Self {
        Self(std::env::vars().collect())
    }

    fn optional(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn parsed_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.optional(key)
            .as_deref()
            .unwrap_or(default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
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
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by the Square developer dashboard."
            ),
        ));
    }

    Ok(())
}
