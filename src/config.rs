//! Configuration loaded from environment variables.

use std::env;

use crate::error::IndexError;
use crate::platform::Platform;

/// Index manager configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relational store connection URL.
    pub database_url: String,

    /// Back-end platform; authoritative since the connection URL alone
    /// can't distinguish MySQL from MariaDB.
    pub platform: Platform,

    /// Maximum pool connections (default: 10).
    pub database_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, IndexError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| {
            IndexError::Configuration("DATABASE_URL environment variable is required".to_string())
        })?;

        let platform = Platform::detect()?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| {
                IndexError::Configuration("DATABASE_MAX_CONNECTIONS must be a valid u32".to_string())
            })?;

        Ok(Self {
            database_url,
            platform,
            database_max_connections,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in ["DATABASE_URL", "DATABASE_PLATFORM", "DATABASE_MAX_CONNECTIONS"] {
            // SAFETY: tests run serialized under ENV_LOCK; no other thread
            // reads these vars concurrently.
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    fn missing_database_url_is_configuration_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        unsafe { env::set_var("DATABASE_PLATFORM", "postgresql") };
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, IndexError::Configuration(_)));
        clear_env();
    }

    #[test]
    fn defaults_max_connections_to_ten() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var("DATABASE_URL", "postgres://localhost/test");
            env::set_var("DATABASE_PLATFORM", "postgresql");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.platform, Platform::Postgresql);
        clear_env();
    }
}
