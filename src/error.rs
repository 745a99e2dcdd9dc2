//! Index manager error types.

use thiserror::Error;

/// Errors the index manager can surface.
///
/// No-op conditions (ending a nonexistent triple, deleting an absent
/// reference) are not represented here — they return `Ok(())`.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Unknown back-end platform, or a required setting is missing. Fatal;
    /// raised before any pool is touched.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Propagated from the relational back-end verbatim. The manager does
    /// not classify or retry these — that's the caller's job.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// A staging-only pre-check found an impossible state, e.g. more than
    /// one live committed row for a single identity key.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
