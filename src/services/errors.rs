use thiserror::Error;

/// Generic error type used by service layer functions.
///
/// Messages carried by `NotFound`, `Conflict` and `Form` are returned to the
/// client verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Login failed. Unknown email and wrong password are indistinguishable.
    #[error("Invalid credentials.")]
    InvalidCredentials,
    /// Requested resource was not found.
    #[error("{0}")]
    NotFound(String),
    /// The write clashes with existing data.
    #[error("{0}")]
    Conflict(String),
    /// Submitted data failed validation.
    #[error("{0}")]
    Form(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
