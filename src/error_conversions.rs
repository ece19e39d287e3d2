//! Conversions from form errors into service errors.
//!
//! Forms live below the service layer and do not know about
//! [`ServiceError`]; routes rely on these impls to turn a rejected body into
//! a 400 response.

use crate::forms::auth::{LoginFormError, RegisterFormError};
use crate::forms::books::BookFormError;
use crate::forms::categories::CategoryFormError;
use crate::services::ServiceError;

impl From<RegisterFormError> for ServiceError {
    fn from(val: RegisterFormError) -> Self {
        ServiceError::Form(format!("User creation failed: {val}"))
    }
}

impl From<LoginFormError> for ServiceError {
    fn from(val: LoginFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<BookFormError> for ServiceError {
    fn from(val: BookFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
