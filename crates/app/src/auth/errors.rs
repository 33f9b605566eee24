//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::ApiTokenError;

/// Errors raised while issuing, authenticating or revoking API tokens.
#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// No live token matches.
    #[error("token not found")]
    NotFound,

    /// The token store failed.
    #[error("storage error")]
    Sql(#[source] Error),

    /// The token could not be parsed.
    #[error("token processing error")]
    Token(#[source] ApiTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<ApiTokenError> for AuthServiceError {
    fn from(error: ApiTokenError) -> Self {
        Self::Token(error)
    }
}
