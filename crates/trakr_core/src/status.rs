use std::fmt;

use serde::{Deserialize, Serialize};

use crate::UniqueId;

/// Outcome reported by every public data-access operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DbStatus {
    Success,
    NoChanges,
    Error,
}

impl DbStatus {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            DbStatus::Success
        } else {
            DbStatus::NoChanges
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, DbStatus::Success)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DbStatus::Success => "Success",
            DbStatus::NoChanges => "NoChanges",
            DbStatus::Error => "Error",
        }
    }
}

impl fmt::Display for DbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub status: DbStatus,
    pub id: Option<UniqueId>,
}

impl Created {
    pub fn success(id: UniqueId) -> Self {
        Self {
            status: DbStatus::Success,
            id: Some(id),
        }
    }

    pub fn error() -> Self {
        Self {
            status: DbStatus::Error,
            id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub status: DbStatus,
    pub items: Vec<T>,
}

impl<T> Listing<T> {
    pub fn success(items: Vec<T>) -> Self {
        Self {
            status: DbStatus::Success,
            items,
        }
    }

    pub fn error() -> Self {
        Self {
            status: DbStatus::Error,
            items: Vec::new(),
        }
    }
}

/// Single-row lookup. A missing row is `NoChanges` with no value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fetched<T> {
    pub status: DbStatus,
    pub value: Option<T>,
}

impl<T> Fetched<T> {
    pub fn from_option(value: Option<T>) -> Self {
        let status = if value.is_some() {
            DbStatus::Success
        } else {
            DbStatus::NoChanges
        };
        Self { status, value }
    }

    pub fn error() -> Self {
        Self {
            status: DbStatus::Error,
            value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DbStatus, Fetched};

    #[test]
    fn rows_affected_maps_to_status() {
        assert_eq!(DbStatus::from_rows_affected(2), DbStatus::Success);
        assert_eq!(DbStatus::from_rows_affected(0), DbStatus::NoChanges);
        assert_eq!(DbStatus::NoChanges.to_string(), "NoChanges");
    }

    #[test]
    fn fetched_reports_missing_rows() {
        let missing: Fetched<u32> = Fetched::from_option(None);
        assert_eq!(missing.status, DbStatus::NoChanges);
        assert_eq!(Fetched::from_option(Some(1)).status, DbStatus::Success);
    }
}
