use std::env;
use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

/// Errors raised while loading process configuration. All of them are fatal:
/// the process must not start serving with incomplete settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Environment variable {name} has an invalid value: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Process configuration, loaded once at startup and injected by reference
/// into the services and stores. Never read from the environment after boot.
#[derive(Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_ttl_minutes: i64,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppSettings {
    /// Load settings from the environment, failing fast on anything missing
    /// or malformed.
    pub fn from_env() -> Result<Self, SettingsError> {
        let database_url = require("DATABASE_URL")?;
        let secret_key = require("SECRET_KEY")?;
        let admin_username = require("ADMIN_DEFAULT_USERNAME")?;
        let admin_password = require("ADMIN_DEFAULT_PASSWORD")?;

        let algorithm = match env::var("ALGORITHM") {
            Ok(raw) => {
                Algorithm::from_str(&raw).map_err(|e| SettingsError::InvalidVar {
                    name: "ALGORITHM",
                    reason: format!("{}: {}", raw, e),
                })?
            }
            Err(_) => Algorithm::HS256,
        };

        let access_token_ttl_minutes = match env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw.parse().map_err(|e| SettingsError::InvalidVar {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: format!("{}: {}", raw, e),
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            database_url,
            secret_key,
            algorithm,
            access_token_ttl_minutes,
            admin_username,
            admin_password,
        })
    }
}

fn require(name: &'static str) -> Result<String, SettingsError> {
    env::var(name).map_err(|_| SettingsError::MissingVar(name))
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &self.database_url)
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}
