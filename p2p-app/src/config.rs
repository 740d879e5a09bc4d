//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use exchange_rates::DEFAULT_API_URL;
use p2p_repo::PoolSettings;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub pool: PoolSettings,
    /// `None` selects the built-in reference table
    pub exchange_rate_api_key: Option<String>,
    pub exchange_rate_api_url: String,
    pub rate_cache_ttl: Duration,
    pub rate_limit_per_minute: u32,
    pub log_json: bool,
    pub otel_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let pool_defaults = PoolSettings::default();

        let database_url = get("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        Ok(Self {
            port: parse_or(get("PORT"), "PORT", 3000)?,
            database_url,
            pool: PoolSettings {
                max_connections: parse_or(
                    get("DB_MAX_CONNECTIONS"),
                    "DB_MAX_CONNECTIONS",
                    pool_defaults.max_connections,
                )?,
                acquire_timeout: Duration::from_secs(parse_or(
                    get("DB_ACQUIRE_TIMEOUT_SECS"),
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    pool_defaults.acquire_timeout.as_secs(),
                )?),
                connect_attempts: parse_or(
                    get("DB_CONNECT_ATTEMPTS"),
                    "DB_CONNECT_ATTEMPTS",
                    pool_defaults.connect_attempts,
                )?,
                retry_delay: Duration::from_secs(parse_or(
                    get("DB_CONNECT_RETRY_DELAY_SECS"),
                    "DB_CONNECT_RETRY_DELAY_SECS",
                    pool_defaults.retry_delay.as_secs(),
                )?),
            },
            exchange_rate_api_key: get("EXCHANGE_RATE_API_KEY"),
            exchange_rate_api_url: get("EXCHANGE_RATE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            rate_cache_ttl: Duration::from_secs(parse_or(
                get("RATE_CACHE_TTL_SECS"),
                "RATE_CACHE_TTL_SECS",
                300,
            )?),
            rate_limit_per_minute: parse_or(
                get("RATE_LIMIT_PER_MINUTE"),
                "RATE_LIMIT_PER_MINUTE",
                100,
            )?,
            log_json: get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            otel_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// Database URL with credentials removed, for logging.
    pub fn database_display(&self) -> &str {
        match self.database_url.rsplit_once('@') {
            Some((_, host)) => host,
            None => &self.database_url,
        }
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, value, e)),
        None => Ok(default),
    }
}
