//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ACCESS_TOKEN_SECRET` - Session token signing secret (min 32 chars, high entropy)
//! - `MONGODB_URI` - Full MongoDB connection string, **or** all of:
//!   - `DB_USER` - MongoDB user
//!   - `DB_PASSWORD` - MongoDB password
//!   - `DB_HOST` - Cluster host (e.g. cluster0.abcde.mongodb.net)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 7000)
//! - `DB_NAME` - Database name (default: yamweb)
//! - `YAMWEB_STORE` - `mongo` (default) or `memory`
//! - `COOKIE_SECURE` - Mark the session cookie `Secure` (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_DATABASE: &str = "yamweb";

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
    "insert",
    "put-your",
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

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Which document store backs the repositories
    pub store: StoreConfig,
    /// Session token and cookie settings
    pub session: SessionConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Document store selection.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// MongoDB (production).
    Mongo(MongoConfig),
    /// Process-local store; data is lost on restart.
    Memory,
}

/// MongoDB connection settings.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// Connection string (contains credentials)
    pub uri: SecretString,
    /// Database holding the `foodItems` and `purchased-items` collections
    pub database: String,
}

/// Session token settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HS256 signing secret
    pub secret: SecretString,
    /// Whether the session cookie is marked `Secure` (and `SameSite=None`)
    pub cookie_secure: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the signing secret fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(&Env::process())
    }

    fn from_vars(env: &Env) -> Result<Self, ConfigError> {
        let host = env
            .get_or("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = env
            .get_or("PORT", "7000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let store = match env.get_or("YAMWEB_STORE", "mongo").as_str() {
            "mongo" => StoreConfig::Mongo(MongoConfig::from_vars(env)?),
            "memory" => StoreConfig::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "YAMWEB_STORE".to_string(),
                    format!("expected 'mongo' or 'memory', got '{other}'"),
                ));
            }
        };

        let session = SessionConfig {
            secret: get_validated_secret(env, "ACCESS_TOKEN_SECRET")?,
            cookie_secure: parse_bool(env, "COOKIE_SECURE", true)?,
        };

        Ok(Self {
            host,
            port,
            store,
            session,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate(env, "SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_rate(env, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MongoConfig {
    /// Load only the database settings from the environment.
    ///
    /// Used by tooling that talks to the store without serving HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if neither `MONGODB_URI` nor the
    /// `DB_USER`/`DB_PASSWORD`/`DB_HOST` triple is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_vars(&Env::process())
    }

    fn from_vars(env: &Env) -> Result<Self, ConfigError> {
        let database = env.get_or("DB_NAME", DEFAULT_DATABASE);

        if let Some(uri) = env.get("MONGODB_URI") {
            return Ok(Self {
                uri: SecretString::from(uri),
                database,
            });
        }

        let user = env.required("DB_USER")?;
        let password = env.required("DB_PASSWORD")?;
        let host = env.required("DB_HOST")?;

        Ok(Self {
            uri: SecretString::from(atlas_uri(&user, &password, &host)),
            database,
        })
    }
}

/// Build an Atlas SRV connection string, percent-encoding the credentials.
fn atlas_uri(user: &str, password: &str, host: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{host}/?retryWrites=true&w=majority",
        urlencoding::encode(user),
        urlencoding::encode(password),
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source: the process environment, or a fixed map in tests.
enum Env {
    Process,
    #[cfg(test)]
    Fixed(HashMap<&'static str, &'static str>),
}

impl Env {
    const fn process() -> Self {
        Self::Process
    }

    fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Process => std::env::var(key).ok(),
            #[cfg(test)]
            Self::Fixed(vars) => vars.get(key).map(|v| (*v).to_string()),
        }
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }
}

fn parse_bool(env: &Env, key: &str, default: bool) -> Result<bool, ConfigError> {
    match env.get(key).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_rate(env: &Env, key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = env.get(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
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

/// Validate that a secret is long enough, not a placeholder, and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(env: &Env, key: &str) -> Result<SecretString, ConfigError> {
    let value = env.required(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
