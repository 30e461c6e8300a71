use crate::core::{AppError, Result};
use serde::Deserialize;
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
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Default hutang/piutang tenor in days, applied when a checkout leaves
    /// a shortfall and no explicit due date was supplied.
    pub tempo_hutang_hari: i64,
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
                tempo_hutang_hari: env::var("TEMPO_HUTANG_HARI")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid TEMPO_HUTANG_HARI".to_string())
                    })?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.tempo_hutang_hari <= 0 {
            return Err(AppError::Configuration(
                "Tenor hutang must be greater than 0 days".to_string(),
            ));
        }

        self.database.validate()?;

        Ok(())
    }
}
