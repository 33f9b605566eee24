//! Products service errors.

use std::num::TryFromIntError;

use sqlx::Error;
use thiserror::Error;

/// Errors raised by the product catalog.
#[derive(Debug, Error)]
pub enum ProductsServiceError {
    /// No live product with that uuid.
    #[error("product not found")]
    NotFound,

    /// Postgres failed.
    #[error("storage error")]
    Sql(#[source] Error),

    /// A stored amount is negative.
    #[error("invalid amount value")]
    InvalidAmount(#[from] TryFromIntError),
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        Self::Sql(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = ProductsServiceError::from(Error::RowNotFound);

        assert!(
            matches!(error, ProductsServiceError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn other_sql_errors_are_storage_errors() {
        let error = ProductsServiceError::from(Error::PoolTimedOut);

        assert!(
            matches!(error, ProductsServiceError::Sql(Error::PoolTimedOut)),
            "expected Sql, got {error:?}"
        );
    }
}
