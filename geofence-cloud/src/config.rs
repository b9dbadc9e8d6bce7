//! Service configuration

use std::time::Duration;

use crate::error::BoxError;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL (PostGIS) connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Pool size upper bound
    pub db_max_connections: u32,
    /// How long a request waits for a pooled connection
    pub db_acquire_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: env_parse("HTTP_PORT").unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            db_acquire_timeout: Duration::from_secs(
                env_parse("DB_ACQUIRE_TIMEOUT_SECS").unwrap_or(5),
            ),
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
