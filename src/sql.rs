//! Dialect-aware SQL text.
//!
//! The index manager talks to its store through `sqlx::Any`, which forwards
//! queries to whichever real driver (PostgreSQL or MySQL/MariaDB) is behind
//! the pool without rewriting placeholder syntax or parameter types. That
//! means bind-parameter style (`$n` vs `?`) and the timestamp cast used to
//! get a bound string into a `TIMESTAMP`/`DATETIME` column are the two things
//! that must vary by platform; everything else is one SQL string shared by
//! all dialects. `commit`'s end-date statement is the one place column
//! syntax itself differs, and gets its own dialect arm.

use crate::platform::Platform;

/// Precomputed per-platform SQL fragments, built once and reused for every
/// statement the manager issues.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    platform: Platform,
}

impl Dialect {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn uses_numbered_placeholders(&self) -> bool {
        matches!(self.platform, Platform::Postgresql)
    }

    fn timestamp_type(&self) -> &'static str {
        match self.platform {
            Platform::H2 | Platform::Postgresql => "TIMESTAMP",
            Platform::Mysql | Platform::MariaDb => "DATETIME",
        }
    }

    /// A bare placeholder for the `idx`-th (1-based) bound parameter.
    pub fn param(&self, idx: usize) -> String {
        if self.uses_numbered_placeholders() {
            format!("${idx}")
        } else {
            "?".to_string()
        }
    }

    /// A placeholder for a bound parameter that must land in a
    /// `TIMESTAMP`/`DATETIME` column, cast from the text form it's bound as.
    pub fn ts_param(&self, idx: usize) -> String {
        format!("CAST({} AS {})", self.param(idx), self.timestamp_type())
    }

    /// Wrap a column expression so it reads back as text, regardless of
    /// platform.
    pub fn text_cast(&self, expr: &str) -> String {
        match self.platform {
            Platform::Postgresql => format!("{expr}::text"),
            Platform::H2 => format!("CAST({expr} AS VARCHAR)"),
            Platform::Mysql | Platform::MariaDb => format!("CAST({expr} AS CHAR)"),
        }
    }
}

/// Timestamp wire format shared by every supported platform: seconds
/// precision, no timezone suffix (values are always UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
