//! Error types for the exchange service.

use crate::domain::CurrencyCode;

/// Domain-level errors (business rule violations). All of them are
/// `InvalidArgument` conditions at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Exchange rate must be a positive number")]
    InvalidRate,

    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,
}

/// Errors from exchange rate providers.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(CurrencyCode),

    #[error("Rate not available for {0} -> {1}")]
    RateNotAvailable(CurrencyCode, CurrencyCode),

    #[error("Rate service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Rate unavailable: {0}")]
    RateUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::InvalidArgument(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            RepoError::StorageUnavailable(e) => AppError::StorageUnavailable(e),
            RepoError::ConcurrentModification(e) => AppError::ConcurrentModification(e),
            RepoError::DuplicateEntity(e) => AppError::DuplicateEntity(e),
            RepoError::Database(e) => AppError::Internal(e),
            RepoError::NotFound => AppError::Internal("Entity vanished during update".into()),
        }
    }
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::UnsupportedCurrency(_) | RateError::RateNotAvailable(..) => {
                AppError::InvalidArgument(err.to_string())
            }
            RateError::ServiceUnavailable(e) => AppError::RateUnavailable(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_invalid_argument() {
        let err: AppError = RepoError::Domain(DomainError::InvalidAmount).into();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_storage_errors_keep_their_kind() {
        assert!(matches!(
            AppError::from(RepoError::StorageUnavailable("pool timed out".into())),
            AppError::StorageUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::ConcurrentModification("wallets".into())),
            AppError::ConcurrentModification(_)
        ));
        assert!(matches!(
            AppError::from(RepoError::DuplicateEntity("users.email".into())),
            AppError::DuplicateEntity(_)
        ));
    }

    #[test]
    fn test_unknown_pair_is_caller_error() {
        let usd = CurrencyCode::parse("USD").unwrap();
        let xyz = CurrencyCode::parse("XYZ").unwrap();
        assert!(matches!(
            AppError::from(RateError::RateNotAvailable(usd, xyz)),
            AppError::InvalidArgument(_)
        ));
        assert!(matches!(
            AppError::from(RateError::ServiceUnavailable("timeout".into())),
            AppError::RateUnavailable(_)
        ));
    }
}
