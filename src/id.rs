//! Opaque resource identifiers, optionally memento-qualified.
//!
//! Ids are partitioned into a base id and an optional memento instant:
//! `<base>@<RFC3339 instant>`. Equality is exact-string on the full form.

use std::fmt;

use chrono::{DateTime, Utc};

const MEMENTO_SEPARATOR: char = '@';

/// A stable, opaque string naming a resource, possibly qualified with a
/// memento instant identifying a historical view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id {
    full: String,
    base_len: usize,
    memento: Option<DateTime<Utc>>,
}

impl Id {
    /// Parse an id from its full string form.
    ///
    /// A `@`-separated suffix that fails to parse as RFC3339 is treated as
    /// part of the base id rather than a memento qualifier — only a
    /// well-formed instant makes this a memento id.
    pub fn new(full: impl Into<String>) -> Self {
        let full = full.into();
        match full.rsplit_once(MEMENTO_SEPARATOR) {
            Some((base, instant)) if !base.is_empty() => {
                match DateTime::parse_from_rfc3339(instant) {
                    Ok(parsed) => Self {
                        base_len: base.len(),
                        memento: Some(parsed.with_timezone(&Utc)),
                        full,
                    },
                    Err(_) => Self {
                        base_len: full.len(),
                        memento: None,
                        full,
                    },
                }
            }
            _ => {
                let base_len = full.len();
                Self {
                    full,
                    base_len,
                    memento: None,
                }
            }
        }
    }

    /// The full id string, memento suffix included if present.
    pub fn full_id(&self) -> &str {
        &self.full
    }

    /// The id with any memento suffix stripped.
    pub fn base_id(&self) -> &str {
        &self.full[..self.base_len]
    }

    /// Whether this id carries a memento instant.
    pub fn is_memento(&self) -> bool {
        self.memento.is_some()
    }

    /// The memento instant, if this id is memento-qualified.
    pub fn memento_instant(&self) -> Option<DateTime<Utc>> {
        self.memento
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::new(value)
    }
}
