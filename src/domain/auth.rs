use serde::{Deserialize, Serialize};

use crate::domain::types::{Role, UserId};

/// Identity of the caller as established from a verified bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// Stable user identifier (the token `sub` claim).
    pub sub: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Parses the subject claim into a typed user id.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse::<i32>().ok().and_then(|id| UserId::new(id).ok())
    }
}

/// Returns `true` when `roles` contains `role`.
pub fn check_role(role: Role, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role.as_str())
}
