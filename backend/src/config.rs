//! Process configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(format!("ENV must be `dev` or `prod`, got `{}`", s)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => f.write_str("dev"),
            Self::Prod => f.write_str("prod"),
        }
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// Deadline for a whole HTTP request.
    pub http_timeout: Duration,
    /// Deadline for a single storage call.
    pub db_timeout: Duration,
    /// HMAC secret used to sign session tokens.
    pub token_secret: String,
    pub token_ttl: Duration,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("http_timeout", &self.http_timeout)
            .field("db_timeout", &self.db_timeout)
            .field("token_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Dev,
            host: "0.0.0.0".to_string(),
            port: 8080,
            http_timeout: Duration::from_secs(30),
            db_timeout: Duration::from_secs(3),
            token_secret: String::new(),
            token_ttl: Duration::from_secs(86_400),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `ENV` (optional, default: `dev`): `dev` or `prod`
    /// - `HOST` (optional, default: `0.0.0.0`)
    /// - `PORT` (optional, default: 8080)
    /// - `HTTP_TIME_OUT` (optional, default: 30): request timeout in seconds
    /// - `DB_TIME_OUT` (optional, default: 3): storage call timeout in seconds
    /// - `TOKEN_SECRET` (optional): token signing secret, falls back to `secret`
    /// - `TOKEN_TTL_SECS` (optional, default: 86400): token lifetime in seconds
    ///
    /// # Errors
    /// Returns an error if a variable is set but cannot be parsed, if the
    /// token lifetime overflows a unix timestamp, or if `ENV=prod` runs
    /// without a token secret.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let environment = match env::var("ENV") {
            Ok(val) => val.parse()?,
            Err(_) => defaults.environment,
        };
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parse_var("PORT")?.unwrap_or(defaults.port);
        let http_timeout = parse_var("HTTP_TIME_OUT")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);
        let db_timeout = parse_var("DB_TIME_OUT")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.db_timeout);
        let token_secret = env::var("TOKEN_SECRET")
            .or_else(|_| env::var("secret"))
            .unwrap_or_default();
        let token_ttl = match parse_var::<u64>("TOKEN_TTL_SECS")? {
            Some(secs) => token_lifetime(secs)?,
            None => defaults.token_ttl,
        };

        if token_secret.is_empty() && environment == Environment::Prod {
            return Err("TOKEN_SECRET must be set when ENV=prod".to_string());
        }

        Ok(Self {
            environment,
            host,
            port,
            http_timeout,
            db_timeout,
            token_secret,
            token_ttl,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token expiry is `now + ttl` as an `i64`, so the lifetime must leave room
/// for the current timestamp.
fn token_lifetime(secs: u64) -> Result<Duration, String> {
    let now = chrono::Utc::now().timestamp();
    i64::try_from(secs)
        .ok()
        .and_then(|s| now.checked_add(s))
        .map(|_| Duration::from_secs(secs))
        .ok_or_else(|| format!("TOKEN_TTL_SECS is too large: `{}`", secs))
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, String> {
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{} has an invalid value: `{}`", key, val)),
        Err(_) => Ok(None),
    }
}
