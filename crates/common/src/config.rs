//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Both services share this
//! loader; `project_service_url` is only consumed by the Task service.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port this service listens on
    pub port: u16,

    /// Postgres connection string
    pub database_url: String,

    /// Shared secret used to validate bearer tokens issued by the auth service
    pub auth_secret: String,

    /// Base URL of the external user service (profile resolution)
    pub user_service_url: String,

    /// Base URL of the Project service; only required by the Task service's
    /// permission bridge
    pub project_service_url: Option<String>,

    /// Base URL used to build links embedded in notifier payloads
    pub frontend_url: String,

    /// Allowed CORS origins, comma-separated in the environment
    pub cors_allowed_origins: Vec<String>,

    /// Base URL of the notifier interface; absent means the logging mock is used
    pub notifier_url: Option<String>,

    /// TTL, in seconds, for the Task service's cached project-permission lookups
    pub permission_cache_ttl_secs: u64,

    pub log_level: String,
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            auth_secret: env::var("AUTH_SECRET")
                .map_err(|_| anyhow::anyhow!("AUTH_SECRET is required"))?,

            user_service_url: env::var("USER_SERVICE_URL")
                .map_err(|_| anyhow::anyhow!("USER_SERVICE_URL is required"))?,

            project_service_url: env::var("PROJECT_SERVICE_URL").ok(),

            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "https://app.example.com".to_string()),

            cors_allowed_origins,

            notifier_url: env::var("NOTIFIER_URL").ok(),

            permission_cache_ttl_secs: env::var("PERMISSION_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };

        Ok(config)
    }
}
