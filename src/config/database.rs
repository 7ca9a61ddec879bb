use crate::core::{AppError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Connection settings for the planning database (read-mostly analytics
/// queries plus the `processes` table)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Connections kept open while idle (`DATABASE_POOL_SIZE`)
    pub min_connections: u32,
    /// Hard ceiling on open connections (`DATABASE_MAX_CONNECTIONS`)
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing
    pub acquire_timeout: Duration,
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}: '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            min_connections: 10,
            max_connections: 20,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn from_env() -> Result<Self> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Configuration("DATABASE_URL not set".to_string()))?;

        let defaults = Self::new(url);
        Ok(Self {
            min_connections: env_or("DATABASE_POOL_SIZE", defaults.min_connections)?,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            acquire_timeout: Duration::from_secs(env_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
            ..defaults
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(AppError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(AppError::Configuration(format!(
                "DATABASE_POOL_SIZE ({}) cannot exceed DATABASE_MAX_CONNECTIONS ({})",
                self.min_connections, self.max_connections
            )));
        }

        Ok(())
    }

    /// Pool settings; connections are recycled every 30 minutes and dropped
    /// after 10 idle minutes
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
    }

    pub async fn create_pool(&self) -> Result<PgPool> {
        let pool = self.pool_options().connect(&self.url).await?;

        tracing::info!(
            min_connections = self.min_connections,
            max_connections = self.max_connections,
            "Database pool initialized"
        );

        Ok(pool)
    }
}
