//! Auth service errors.
//!
//! Malformed, unknown, revoked and expired tokens all surface as `NotFound`.

use sqlx::Error;
use thiserror::Error;

use crate::auth::ApiTokenError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("api token not found or no longer active")]
    NotFound,

    #[error("failed to query api tokens")]
    Sql(#[source] Error),

    #[error("failed to process api token")]
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
