use chrono::NaiveDateTime;

use crate::domain::types::{Email, PasswordHash, UserId, Username};

/// Registered account. The password is only ever held as a PHC hash.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub created_at: NaiveDateTime,
}
