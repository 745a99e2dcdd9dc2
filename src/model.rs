//! Row and triple types shared by the committed and staging relations.

use chrono::{DateTime, Utc};

use crate::id::Id;

/// A membership triple: a container's assertion about a subject/object pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: Id,
    pub property: String,
    pub object: Id,
}

impl Triple {
    pub fn new(subject: impl Into<Id>, property: impl Into<String>, object: impl Into<Id>) -> Self {
        Self {
            subject: subject.into(),
            property: property.into(),
            object: object.into(),
        }
    }
}

/// Pending ADD or DELETE marker on a staging row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Delete,
}

impl Operation {
    pub(crate) fn as_db_str(self) -> &'static str {
        match self {
            Operation::Add => "A",
            Operation::Delete => "D",
        }
    }

    pub(crate) fn from_db_str(value: &str) -> Self {
        match value {
            "A" => Operation::Add,
            _ => Operation::Delete,
        }
    }
}

/// Marks a DELETE staging row as a hard purge rather than an end-date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceFlag {
    Force,
    NotForce,
}

impl ForceFlag {
    pub(crate) fn as_db_str(self) -> Option<&'static str> {
        match self {
            ForceFlag::Force => Some("FORCE"),
            ForceFlag::NotForce => None,
        }
    }

    pub(crate) fn from_db_str(value: Option<&str>) -> Self {
        match value {
            Some("FORCE") => ForceFlag::Force,
            _ => ForceFlag::NotForce,
        }
    }

    pub(crate) fn is_force(self) -> bool {
        matches!(self, ForceFlag::Force)
    }
}

/// A committed membership interval, durably visible to every reader.
///
/// Uniqueness key: `(source_id, subject_id, property, object_id, start_time)`.
#[derive(Debug, Clone)]
pub struct MembershipRow {
    pub source_id: String,
    pub subject_id: String,
    pub property: String,
    pub object_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A pending addition or deletion, scoped to a transaction id.
#[derive(Debug, Clone)]
pub struct StagingRow {
    pub source_id: String,
    pub subject_id: String,
    pub property: String,
    pub object_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub tx_id: String,
    pub operation: Operation,
    pub force_flag: ForceFlag,
}
