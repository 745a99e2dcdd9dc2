#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]
//! Common test infrastructure for integration tests.
//!
//! Uses the real `IndexManager` against a real database — no mocks.

use membership_index::{Config, IndexManager};

/// A connected, schema-initialized manager shared by a test module.
pub struct TestIndex {
    pub manager: IndexManager,
}

impl TestIndex {
    /// Connect using `DATABASE_URL`/`DATABASE_PLATFORM` and ensure the
    /// schema exists. Safe to call from many tests concurrently — schema
    /// application is idempotent.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let config = Config::from_env().expect("failed to load test configuration");
        let manager = IndexManager::connect(&config)
            .await
            .expect("failed to connect to test database");
        manager.init_schema().await.expect("failed to apply schema");

        Self { manager }
    }
}

/// A fresh, collision-free id for use as a transaction id or resource
/// component within one test.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::now_v7().simple())
}
