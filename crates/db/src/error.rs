//! Store error type shared by every repository.

use gledger_core::ledger::LedgerError;
use gledger_shared::{AppError, ErrorCode};
use sea_orm::DbErr;

/// Errors returned by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No live row matched tenant, key and (for mutations) version.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A posting or lexical rule rejected the input.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Returns the RPC error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Ledger(e) => e.code(),
            Self::Database(_) => ErrorCode::Persistence,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(err.to_string()),
            StoreError::Ledger(e) => e.into(),
            StoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}
