use crate::auth::TokenError;
use crate::db::repository::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the service layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required input was missing or malformed.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Unknown email or wrong password. Both read the same to the caller.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        if err.is_conflict() {
            ServiceError::Conflict(err.message().to_string())
        } else {
            ServiceError::Repository(err)
        }
    }
}
