use std::env;
use std::fmt;

const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Raised when the process environment cannot produce a usable [`Config`].
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Settings for the text-generation service.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    /// When true a failed generation is answered with HTTP 200 and the error text as content.
    pub errors_as_text: bool,
}

/// Everything the server needs at startup, built once and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub generation: GenerationConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_minutes: token_ttl_or(&lookup, DEFAULT_TOKEN_TTL_MINUTES)?,
            generation: GenerationConfig {
                api_key: required("GEMINI_API_KEY")?,
                model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: lookup("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout_secs: match lookup("GEMINI_TIMEOUT_SECS") {
                    Some(raw) => Some(parse_value("GEMINI_TIMEOUT_SECS", raw)?),
                    None => None,
                },
                errors_as_text: parse_or(&lookup, "GENERATION_ERRORS_AS_TEXT", true)?,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => parse_value(key, raw),
        None => Ok(default),
    }
}

/// Token lifetime in minutes; it must be positive and fit a `chrono::Duration`.
fn token_ttl_or<F>(lookup: &F, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const KEY: &str = "ACCESS_TOKEN_EXPIRE_MINUTES";
    let minutes: i64 = parse_or(lookup, KEY, default)?;
    if minutes <= 0 || chrono::Duration::try_minutes(minutes).is_none() {
        return Err(ConfigError::Invalid {
            key: KEY,
            value: minutes.to_string(),
        });
    }
    Ok(minutes)
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}
