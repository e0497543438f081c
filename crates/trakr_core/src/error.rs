use thiserror::Error;

/// Failure to mint a unique id. Never retried by the allocator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("store is closed")]
    StoreClosed,
    #[error("id generator insert failed: {message}")]
    Insert { message: String },
    #[error("sequence {sequence} does not fit the 32-bit id range")]
    SequenceExhausted { sequence: i64 },
}

impl AllocationError {
    pub fn insert(message: impl Into<String>) -> Self {
        Self::Insert {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for AllocationError {
    fn from(value: sea_orm::DbErr) -> Self {
        AllocationError::insert(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum TrakrError {
    #[error("storage error: {message}")]
    Storage { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("store is not useable: {message}")]
    Unavailable { message: String },
    #[error("id allocation failed: {0}")]
    Allocation(#[from] AllocationError),
    #[error("insert failed: {message}")]
    Insert { message: String },
}

impl TrakrError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn insert(message: impl Into<String>) -> Self {
        Self::Insert {
            message: message.into(),
        }
    }
}

pub type TrakrResult<T> = Result<T, TrakrError>;

impl From<sea_orm::DbErr> for TrakrError {
    fn from(value: sea_orm::DbErr) -> Self {
        TrakrError::storage(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{AllocationError, TrakrError};

    #[test]
    fn helper_constructors_set_variants() {
        let err = TrakrError::storage("disk");
        assert!(matches!(err, TrakrError::Storage { .. }));
        let err = TrakrError::not_found("missing");
        assert!(matches!(err, TrakrError::NotFound { .. }));
        let err = TrakrError::invalid("bad");
        assert!(matches!(err, TrakrError::InvalidInput { .. }));
        let err = TrakrError::unavailable("closed");
        assert!(matches!(err, TrakrError::Unavailable { .. }));
        let err = TrakrError::insert("constraint");
        assert!(matches!(err, TrakrError::Insert { .. }));
    }

    #[test]
    fn allocation_errors_convert() {
        let err: TrakrError = AllocationError::StoreClosed.into();
        assert!(matches!(
            err,
            TrakrError::Allocation(AllocationError::StoreClosed)
        ));
        assert_eq!(
            AllocationError::SequenceExhausted { sequence: 1 << 33 }.to_string(),
            "sequence 8589934592 does not fit the 32-bit id range"
        );
    }
}
