use crate::services::QueryDeadlines;
use dotenv::dotenv;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_JWT_SECRET: &str = "idm-development-secret-do-not-use-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub app_name: String,
    pub app_version: String,
    pub app_env: String,
    pub find_all_timeout: Duration,
    pub find_page_timeout: Duration,
}

impl Config {
    /// Loads the configuration from environment variables.
    /// Calls dotenv() first, so a `.env` file in the working directory is honored.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the
    /// process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| "DATABASE_URL must be set in .env file".to_string())?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using default (not secure for production!)");
            DEFAULT_JWT_SECRET.to_string()
        });

        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = lookup("SERVER_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = lookup("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let app_name = lookup("APP_NAME").unwrap_or_else(|| "idm".to_string());
        let app_version =
            lookup("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        let find_all_timeout = Self::millis(&lookup, "FIND_ALL_TIMEOUT_MS", 2000)?;
        let find_page_timeout = Self::millis(&lookup, "FIND_PAGE_TIMEOUT_MS", 4000)?;

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            app_name,
            app_version,
            app_env,
            find_all_timeout,
            find_page_timeout,
        })
    }

    fn millis(
        lookup: &impl Fn(&str) -> Option<String>,
        key: &str,
        default: u64,
    ) -> Result<Duration, String> {
        match lookup(key) {
            None => Ok(Duration::from_millis(default)),
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| format!("Invalid {key}: must be a positive number of milliseconds")),
        }
    }

    pub fn deadlines(&self) -> QueryDeadlines {
        QueryDeadlines {
            find_all: self.find_all_timeout,
            find_page: self.find_page_timeout,
        }
    }

    /// Logs the configuration, hiding secrets
    pub fn log_info(&self) {
        info!(
            environment = %self.app_env,
            address = %format!("{}:{}", self.server_host, self.server_port),
            database = %Self::mask_url(&self.database_url),
            max_connections = self.max_connections,
            find_all_timeout = ?self.find_all_timeout,
            find_page_timeout = ?self.find_page_timeout,
            "{} {} configuration loaded",
            self.app_name,
            self.app_version
        );
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("JWT secret: USING DEFAULT (INSECURE!)");
        }
    }

    /// Masks the credentials of the database URL for logging
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        "***".to_string()
    }
}
