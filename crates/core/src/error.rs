//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Coarse classification of a [`LedgerError`].
///
/// The boundary layer maps kinds to transport status codes; the core never does.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Forbidden,
    Internal,
}

/// Ledger-level error.
///
/// Every variant carries a human-readable message suitable for returning to a caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No entity exists for the given identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required field is missing or malformed (including unparseable
    /// decimals, unknown currency codes and non-positive amounts).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The request is well-formed but not allowed in the current state
    /// (inactive account, same-account transfer, insufficient funds).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A store commit/delete failed unexpectedly, e.g. the entity vanished
    /// concurrently or a lock was poisoned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::Validation(_) => ErrorKind::Validation,
            LedgerError::Forbidden(_) => ErrorKind::Forbidden,
            LedgerError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The bare message without the kind prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            LedgerError::NotFound(m)
            | LedgerError::Validation(m)
            | LedgerError::Forbidden(m)
            | LedgerError::Internal(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(LedgerError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(LedgerError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(LedgerError::forbidden("x").kind(), ErrorKind::Forbidden);
        assert_eq!(LedgerError::internal("x").kind(), ErrorKind::Internal);
    }

    #[test]
    fn message_strips_prefix() {
        let err = LedgerError::forbidden("Insufficient funds.");
        assert_eq!(err.message(), "Insufficient funds.");
        assert_eq!(err.to_string(), "forbidden: Insufficient funds.");
    }
}
