//! Centralized error types for Fightlog.

use crate::roster::RosterViolationKind;
use fightlog_db::DbError;
use thiserror::Error;

/// Main error type for Fightlog operations.
#[derive(Error, Debug)]
pub enum FightlogError {
    #[error("Fight not found: {0}")]
    FightNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Fighter not found: {0}")]
    FighterNotFound(String),

    #[error("Unknown tag type: {0}")]
    UnknownTagType(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Roster rejected ({kind}): {message}")]
    RosterViolation {
        kind: RosterViolationKind,
        message: String,
    },

    #[error("The '{tag_type}' tag cannot be changed once the fight is created")]
    ImmutableTag { tag_type: String },

    #[error("Concurrent write conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("Corrupt stored record: {0}")]
    CorruptRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for Fightlog operations.
pub type FightlogResult<T> = Result<T, FightlogError>;

/// The four kinds of failure a caller has to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl From<DbError> for FightlogError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl FightlogError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a roster violation.
    pub fn roster(kind: RosterViolationKind, msg: impl Into<String>) -> Self {
        Self::RosterViolation {
            kind,
            message: msg.into(),
        }
    }

    /// Classify the error for callers mapping it onto a transport.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FightNotFound(_) | Self::TagNotFound(_) | Self::FighterNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::RosterViolation {
                kind: RosterViolationKind::UnknownFighter,
                ..
            } => ErrorKind::NotFound,
            Self::UnknownTagType(_)
            | Self::ValidationError(_)
            | Self::RosterViolation { .. }
            | Self::ImmutableTag { .. } => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Database(_) | Self::CorruptRecord(_) | Self::Config(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conflict_stays_a_conflict() {
        let err: FightlogError = DbError::Conflict("UNIQUE constraint failed".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err: FightlogError = DbError::Migration("boom".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_unknown_fighter_is_not_found() {
        let err = FightlogError::roster(RosterViolationKind::UnknownFighter, "ghost");
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = FightlogError::roster(RosterViolationKind::DuplicateFighter, "twice");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
