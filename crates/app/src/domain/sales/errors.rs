//! Sales errors.

use pricetag::schedule::RecurrenceError;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Sale store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the lookup.
    #[error("record not found")]
    NotFound,

    /// A foreign key did not resolve.
    #[error("related resource not found")]
    InvalidReference,

    /// A row violated a check or not-null constraint.
    #[error("invalid data")]
    InvalidData,

    /// Any other database failure.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

/// Sales service failure.
#[derive(Debug, Error)]
pub enum SalesServiceError {
    /// The sale does not exist or is not active for the request.
    #[error("sale not found")]
    SaleNotFound,

    /// The product does not exist in the request's store.
    #[error("product not found")]
    ProductNotFound,

    /// The sweep instant could not be floored to a tick.
    #[error("failed to compute sweep tick")]
    Clock(#[source] jiff::Error),

    /// A recurrence expression could not be evaluated.
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    /// The sale store failed.
    #[error("sale store error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for SalesServiceError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}
