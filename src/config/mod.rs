use crate::core::{AppError, CurrencyRates, Result};
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// `console` (default) or `json`
    pub log_format: String,
}

/// Settings consumed by the return analysis engine
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Exchange-rate table, fixed for the lifetime of the process
    pub currency_rates: CurrencyRates,
}

impl AnalyticsConfig {
    pub fn from_env() -> Result<Self> {
        let overrides = env::var("EXCHANGE_RATES").unwrap_or_default();
        let currency_rates = CurrencyRates::parse_overrides(&overrides)
            .map_err(|e| AppError::Configuration(format!("Invalid EXCHANGE_RATES: {}", e)))?;

        Ok(AnalyticsConfig { currency_rates })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "console".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            analytics: AnalyticsConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        self.database.validate()?;

        if !matches!(self.app.log_format.as_str(), "console" | "json") {
            return Err(AppError::Configuration(format!(
                "Unsupported LOG_FORMAT '{}', expected 'console' or 'json'",
                self.app.log_format
            )));
        }

        Ok(())
    }
}
