#![forbid(unsafe_code)]

use wbs_core::ValidationError;
use wbs_core::ids::ProjectIdError;

/// Coarse error classes surfaced to callers of the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Store,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid project id: {0}")]
    InvalidProjectId(#[from] ProjectIdError),
    #[error("unknown {entity}: {id}")]
    UnknownId { entity: &'static str, id: String },
    #[error("revision mismatch (expected={expected}, actual={actual})")]
    RevisionMismatch { expected: i64, actual: i64 },
}

impl StoreError {
    pub(crate) fn unknown(entity: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownId {
            entity,
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::Validation(_) | Self::InvalidProjectId(_) => {
                ErrorKind::Validation
            }
            Self::UnknownId { .. } => ErrorKind::NotFound,
            Self::RevisionMismatch { .. } => ErrorKind::Conflict,
            Self::Io(_) | Self::Sql(_) => ErrorKind::Store,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Store => "STORE",
        }
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, _) => {
            code.code == rusqlite::ErrorCode::ConstraintViolation
        }
        _ => false,
    }
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                || message
                    .as_deref()
                    .is_some_and(|value| value.contains("FOREIGN KEY constraint failed"))
        }
        _ => false,
    }
}
