use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{Email, PasswordHash, Role, TypeConstraintError, Username};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub created_at: NaiveDateTime,
}

/// Diesel model representing the `roles` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::roles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbRole {
    pub id: i32,
    pub name: String,
}

/// Row of the `user_roles` join table.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::user_roles)]
pub struct NewUserRole {
    pub user_id: i32,
    pub role_id: i32,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
            email: Email::new(user.email)?,
            password_hash: PasswordHash::new(user.password_hash)?,
            created_at: user.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            username: user.username.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            created_at: user.created_at,
        }
    }
}

impl TryFrom<DbRole> for Role {
    type Error = TypeConstraintError;

    fn try_from(role: DbRole) -> Result<Self, Self::Error> {
        role.name.parse()
    }
}
