//! Ledger error types for validation and posting errors.
//!
//! Every variant maps onto one of the numeric RPC error codes so that the
//! service layer can turn it into a response without matching on strings.

use gledger_shared::{AppError, ErrorCode};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Transaction lines are not balanced (debits != credits).
    #[error("credits and debits do not balance. Debit: {debit}, Credit: {credit}")]
    UnbalancedTransaction {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A side of the batch overflowed the decimal range.
    #[error("line amounts overflow")]
    AmountOverflow,

    /// The transaction has no sequence numbers left for the batch.
    #[error("detail sequence numbers exhausted")]
    SequenceExhausted,

    /// A name field does not match the lexical pattern.
    #[error("{0} invalid format")]
    InvalidName(&'static str),

    /// A label field is empty or too long.
    #[error("{0} must be 1 to 64 characters")]
    InvalidLabel(&'static str),

    // ========== Reference Errors ==========
    /// Transaction not found, deleted, or owned by another tenant.
    #[error("transaction not found: {0}")]
    TransactionNotFound(i64),

    /// Account not found, deleted, or owned by another tenant.
    #[error("account not found: {0}")]
    AccountNotFound(Uuid),

    // ========== Database Errors ==========
    /// The store failed the operation.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the RPC error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnbalancedTransaction { .. }
            | Self::AmountOverflow
            | Self::SequenceExhausted
            | Self::InvalidName(_)
            | Self::InvalidLabel(_) => ErrorCode::Validation,
            Self::TransactionNotFound(_) | Self::AccountNotFound(_) => ErrorCode::NotFound,
            Self::Database(_) => ErrorCode::Persistence,
        }
    }

    /// Returns a stable label for logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnbalancedTransaction { .. } => "UNBALANCED_TRANSACTION",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::SequenceExhausted => "SEQUENCE_EXHAUSTED",
            Self::InvalidName(_) => "INVALID_NAME",
            Self::InvalidLabel(_) => "INVALID_LABEL",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.code() {
            ErrorCode::Validation => Self::Validation(message),
            ErrorCode::NotFound => Self::NotFound(message),
            ErrorCode::Persistence => Self::Database(message),
            _ => Self::Internal(message),
        }
    }
}
