//! Application-wide error types and RPC error codes.
//!
//! Business failures never reach the transport as faults. Every response
//! carries one of the numeric [`ErrorCode`]s and a message instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Numeric outcome code carried by every RPC response.
///
/// Authorization codes reuse the HTTP numbering clients already know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ErrorCode {
    /// Success.
    Ok,
    /// Missing, invalid or insufficient credentials.
    NotAuthorized,
    /// No live row matched (also the optimistic-concurrency conflict signal).
    NotFound,
    /// The bearer token has expired; the client should refresh it.
    TokenExpired,
    /// Unexpected internal failure.
    Internal,
    /// The store could not commit the write.
    Persistence,
    /// Input rejected before any mutation.
    Validation,
}

impl ErrorCode {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::NotAuthorized => 401,
            Self::NotFound => 404,
            Self::TokenExpired => 498,
            Self::Internal => 500,
            Self::Persistence => 501,
            Self::Validation => 510,
        }
    }

    /// Returns true for the success code.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.as_i32()
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Ok),
            401 => Ok(Self::NotAuthorized),
            404 => Ok(Self::NotFound),
            498 => Ok(Self::TokenExpired),
            500 => Ok(Self::Internal),
            501 => Ok(Self::Persistence),
            510 => Ok(Self::Validation),
            other => Err(format!("unknown error code {other}")),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Response message for every store failure.
pub const PERSISTENCE_FAILURE: &str = "persistence failure";

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// No token was presented, or it failed verification.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The token was valid but has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Resource not found, or its version no longer matches.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store rejected or failed the write.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the RPC error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized(_) => ErrorCode::NotAuthorized,
            Self::TokenExpired => ErrorCode::TokenExpired,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::Validation,
            Self::Database(_) => ErrorCode::Persistence,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Returns a stable label for logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "NOT_AUTHORIZED",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the message placed in the response body.
    ///
    /// This is the bare detail without the category prefix. Store failures
    /// only report a generic message; the detail stays in the server log.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Database(_) => PERSISTENCE_FAILURE.to_string(),
            Self::TokenExpired => "token expired".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::Ok, 0)]
    #[case(ErrorCode::NotAuthorized, 401)]
    #[case(ErrorCode::NotFound, 404)]
    #[case(ErrorCode::TokenExpired, 498)]
    #[case(ErrorCode::Internal, 500)]
    #[case(ErrorCode::Persistence, 501)]
    #[case(ErrorCode::Validation, 510)]
    fn test_wire_values(#[case] code: ErrorCode, #[case] wire: i32) {
        assert_eq!(code.as_i32(), wire);
        assert_eq!(ErrorCode::try_from(wire).unwrap(), code);
    }

    #[test]
    fn test_unknown_wire_value_rejected() {
        assert!(ErrorCode::try_from(418).is_err());
    }

    #[test]
    fn test_error_code_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::TokenExpired).unwrap(), "498");
        let code: ErrorCode = serde_json::from_str("510").unwrap();
        assert_eq!(code, ErrorCode::Validation);
    }

    #[test]
    fn test_app_error_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).code(), ErrorCode::NotAuthorized);
        assert_eq!(AppError::TokenExpired.code(), ErrorCode::TokenExpired);
        assert_eq!(AppError::NotFound(String::new()).code(), ErrorCode::NotFound);
        assert_eq!(AppError::Validation(String::new()).code(), ErrorCode::Validation);
        assert_eq!(AppError::Database(String::new()).code(), ErrorCode::Persistence);
        assert_eq!(AppError::Internal(String::new()).code(), ErrorCode::Internal);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("account not found".into()).to_string(),
            "Not found: account not found"
        );
        assert_eq!(AppError::TokenExpired.to_string(), "Token expired");
        assert_eq!(
            AppError::Validation("msg".into()).message(),
            "msg"
        );
    }

    #[test]
    fn test_database_detail_stays_out_of_message() {
        let err = AppError::Database(
            "error returned from database: (code: 5) database is locked".into(),
        );
        assert_eq!(err.message(), PERSISTENCE_FAILURE);
        assert!(err.to_string().contains("database is locked"));
    }
}
