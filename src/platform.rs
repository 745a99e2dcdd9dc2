//! Back-end platform detection.
//!
//! `DATABASE_PLATFORM` is the authoritative selector — a bare connection
//! string can't distinguish MySQL from MariaDB, and H2 has no connection
//! string shape of its own in this crate since it is never actually dialed.

use std::fmt;
use std::str::FromStr;

use crate::error::IndexError;

/// One of the four relational back-ends the index manager's DDL and
/// commit-SQL tables are specified for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    H2,
    Postgresql,
    Mysql,
    MariaDb,
}

impl Platform {
    /// Read `DATABASE_PLATFORM` from the environment. Missing or unknown
    /// values are a fatal [`IndexError::Configuration`] — an unrecognized
    /// platform is a configuration error, not a fallback.
    pub fn detect() -> Result<Self, IndexError> {
        let raw = std::env::var("DATABASE_PLATFORM")
            .map_err(|_| IndexError::Configuration("DATABASE_PLATFORM is not set".to_string()))?;
        raw.parse()
    }

    /// sqlx has no H2 driver; every other platform routes through a real
    /// pool (MySQL's driver also speaks MariaDB's wire protocol).
    pub fn has_driver(self) -> bool {
        !matches!(self, Platform::H2)
    }
}

impl FromStr for Platform {
    type Err = IndexError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "h2" => Ok(Platform::H2),
            "postgresql" | "postgres" => Ok(Platform::Postgresql),
            "mysql" => Ok(Platform::Mysql),
            "mariadb" => Ok(Platform::MariaDb),
            other => Err(IndexError::Configuration(format!(
                "unknown DATABASE_PLATFORM '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::H2 => "h2",
            Platform::Postgresql => "postgresql",
            Platform::Mysql => "mysql",
            Platform::MariaDb => "mariadb",
        };
        f.write_str(name)
    }
}
