use crate::domains::permission::capability::{
    AdminCapabilityTable, DEFAULT_DELETER_ADMIN_EMAIL, DEFAULT_FULL_ADMIN_EMAIL,
    DEFAULT_READER_ADMIN_EMAIL, DEFAULT_WRITER_ADMIN_EMAIL,
};
use crate::errors::{ServiceError, ServiceResult};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://donation_platform.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_JWT_SECRET: &str = "development-secret-change-me";
const DEVELOPMENT_ENV: &str = "development";
const DEFAULT_JWT_EXPIRES_IN_SECS: i64 = 24 * 60 * 60;

/// Runtime configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub jwt_expires_in_secs: i64,
    pub admin_capabilities: AdminCapabilityTable,
}

impl AppConfig {
    /// Load configuration from the process environment, after merging a `.env`
    /// file when one is present.
    pub fn from_env() -> ServiceResult<Self> {
        if let Err(e) = dotenv::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let development = var("APP_ENV")
            .map(|v| v.trim().eq_ignore_ascii_case(DEVELOPMENT_ENV))
            .unwrap_or(false);

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if development => {
                log::warn!("JWT_SECRET is not set; falling back to the development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
            None => {
                return Err(ServiceError::Configuration(
                    "JWT_SECRET must be set unless APP_ENV=development".to_string(),
                ))
            }
        };

        let jwt_expires_in_secs = match var("JWT_EXPIRES_IN_SECS") {
            Some(raw) => raw.parse::<i64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                ServiceError::Configuration(format!("JWT_EXPIRES_IN_SECS must be a positive integer, got '{}'", raw))
            })?,
            None => DEFAULT_JWT_EXPIRES_IN_SECS,
        };

        let admin_capabilities = AdminCapabilityTable::standard(
            &or("ADMIN_FULL_EMAIL", DEFAULT_FULL_ADMIN_EMAIL),
            &or("ADMIN_READER_EMAIL", DEFAULT_READER_ADMIN_EMAIL),
            &or("ADMIN_WRITER_EMAIL", DEFAULT_WRITER_ADMIN_EMAIL),
            &or("ADMIN_DELETER_EMAIL", DEFAULT_DELETER_ADMIN_EMAIL),
        );

        Ok(Self {
            database_url: or("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr: or("BIND_ADDR", DEFAULT_BIND_ADDR),
            jwt_secret,
            jwt_expires_in_secs,
            admin_capabilities,
        })
    }

    /// Configuration for tests and local tooling: in-memory database, fixed secret.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_secs: 3600,
            admin_capabilities: AdminCapabilityTable::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_jwt_secret_is_rejected_outside_development() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));

        let err = AppConfig::from_lookup(lookup(&[("APP_ENV", "production"), ("JWT_SECRET", "  ")])).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[test]
    fn development_falls_back_to_the_default_secret() {
        let config = AppConfig::from_lookup(lookup(&[("APP_ENV", "Development")])).unwrap();
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.jwt_expires_in_secs, DEFAULT_JWT_EXPIRES_IN_SECS);
    }

    #[test]
    fn explicit_values_win() {
        let config = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN_SECS", "60"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_expires_in_secs, 60);
        assert_eq!(config.database_url, "sqlite::memory:");

        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret"), ("JWT_EXPIRES_IN_SECS", "-5")]))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }
}
