use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::types::{Email, TypeConstraintError, Username};

const PASSWORD_SPECIALS: &str = "@$!%*?&_";

/// Password policy: lowercase, uppercase, digit and one of `@$!%*?&_`, built
/// only from letters, digits and those specials.
fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if allowed && has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_policy");
        error.message = Some(
            "Password must contain at least one uppercase, one lowercase, one number, and one special character"
                .into(),
        );
        Err(error)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 6, message = "Username must be at least 6 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid Email address"))]
    pub email: String,
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        custom(function = "validate_password_policy")
    )]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFormPayload {
    pub username: Username,
    pub email: Email,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum RegisterFormError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RegisterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RegisterFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RegisterForm> for RegisterFormPayload {
    type Error = RegisterFormError;

    fn try_from(mut value: RegisterForm) -> Result<Self, Self::Error> {
        // Length and address checks apply to what gets stored.
        value.username = value.username.trim().to_string();
        value.email = value.email.trim().to_string();
        value.validate()?;

        Ok(Self {
            username: Username::new(value.username)?,
            email: Email::new(value.email)?,
            password: value.password,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Credentials as submitted. The email is deliberately left unchecked so an
/// unknown and a malformed address fail login the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum LoginFormError {
    #[error("Login form validation failed: {0}")]
    Validation(String),
}

impl From<ValidationErrors> for LoginFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = LoginFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: value.email.trim().to_string(),
            password: value.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        let payload: RegisterFormPayload = form(" alice01 ", " alice@x.com ", "Secret_1")
            .try_into()
            .unwrap();
        assert_eq!(payload.username, "alice01");
        assert_eq!(payload.email.as_str(), "alice@x.com");
    }

    #[test]
    fn password_policy_is_enforced() {
        for password in ["secret_1", "SECRET_1", "Secret__", "Secret11", "Se_1", "Secret 1", "Secrét_1"] {
            let result = RegisterFormPayload::try_from(form("alice01", "alice@x.com", password));
            assert!(result.is_err(), "{password} should be rejected");
        }
    }

    #[test]
    fn short_username_and_bad_email_are_rejected() {
        assert!(RegisterFormPayload::try_from(form("alice", "alice@x.com", "Secret_1")).is_err());
        assert!(RegisterFormPayload::try_from(form("  alice  ", "alice@x.com", "Secret_1")).is_err());
        assert!(RegisterFormPayload::try_from(form("alice01", "alice", "Secret_1")).is_err());
    }

    #[test]
    fn login_requires_both_fields() {
        let empty = LoginForm {
            email: String::new(),
            password: "x".into(),
        };
        assert!(LoginFormPayload::try_from(empty).is_err());

        let ok = LoginForm {
            email: " alice@x.com".into(),
            password: "Secret_1".into(),
        };
        assert_eq!(LoginFormPayload::try_from(ok).unwrap().email, "alice@x.com");
    }
}
