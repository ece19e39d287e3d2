//! Startup seeding: role rows and the first administrator.

use chrono::Utc;
use thiserror::Error;

use crate::auth::password::{PasswordError, hash_password};
use crate::domain::types::{Email, Role, TypeConstraintError, Username};
use crate::domain::user::NewUser;
use crate::models::config::BootstrapAdminConfig;
use crate::repository::{Outcome, RepositoryError, UserReader, UserWriter};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("bootstrap admin is misconfigured: {0}")]
    InvalidAdmin(#[from] TypeConstraintError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("bootstrap admin {0} could not be created")]
    AdminNotCreated(String),
}

/// Ensure every role exists and, when configured, that the bootstrap
/// administrator exists. Safe to run on every start.
pub fn seed<R>(admin: Option<&BootstrapAdminConfig>, repo: &R) -> Result<(), BootstrapError>
where
    R: UserReader + UserWriter,
{
    let added = repo.ensure_roles(&Role::ALL)?;
    if added > 0 {
        log::info!("Seeded {added} role(s)");
    }

    let Some(admin) = admin else {
        return Ok(());
    };

    let email = Email::new(admin.email.as_str())?;
    if repo.get_user_by_email(&email)?.is_some() {
        return Ok(());
    }

    let new_user = NewUser {
        username: Username::new(admin.username.as_str())?,
        email,
        password_hash: hash_password(&admin.password)?,
        created_at: Utc::now().naive_utc(),
    };

    let user = match repo.create_user(&new_user)? {
        Outcome::Success(user) => user,
        Outcome::Conflict | Outcome::NotFound => {
            return Err(BootstrapError::AdminNotCreated(admin.email.clone()));
        }
    };

    match repo.assign_role(user.id, Role::Admin)? {
        Outcome::Success(()) => {
            log::info!("Created bootstrap administrator {}", user.email);
            Ok(())
        }
        Outcome::Conflict | Outcome::NotFound => {
            Err(BootstrapError::AdminNotCreated(admin.email.clone()))
        }
    }
}
