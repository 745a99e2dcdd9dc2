//! Connection pool management.
//!
//! Mirrors `trovato_kernel::db`'s `create_pool`/`run_migrations` shape, but
//! targets whichever platform `Config` selects through `sqlx::Any` rather
//! than a single hard-coded backend.

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

use crate::config::Config;
use crate::ddl;
use crate::error::{IndexError, IndexResult};
use crate::platform::Platform;
use crate::sql::Dialect;

/// Owns the connection pool and the dialect it was built for. Cheap to
/// clone — `AnyPool` is an `Arc` handle, same as `sqlx::PgPool`.
#[derive(Clone)]
pub struct Backend {
    pool: AnyPool,
    dialect: Dialect,
}

impl Backend {
    /// Connect using `config`. Fails fast with `IndexError::Configuration`
    /// for `Platform::H2`, which has no driver available in this ecosystem.
    pub async fn connect(config: &Config) -> IndexResult<Self> {
        if !config.platform.has_driver() {
            return Err(IndexError::Configuration(format!(
                "platform '{}' has no available driver",
                config.platform
            )));
        }

        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self {
            pool,
            dialect: Dialect::new(config.platform),
        })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn platform(&self) -> Platform {
        self.dialect.platform()
    }

    /// Apply this backend's DDL script inside one transaction.
    pub async fn init_schema(&self) -> IndexResult<()> {
        let mut tx = self.pool.begin().await?;
        for statement in split_statements(ddl::script_for(self.platform())) {
            sqlx::query(&statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

/// Split a DDL script into individual statements, stripping `--` comments
/// and blank lines. `sqlx::Any` executes one statement per call.
fn split_statements(script: &str) -> Vec<String> {
    let without_comments: String = script
        .lines()
        .map(|line| match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
