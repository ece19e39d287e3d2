//! Account registration and login.

use chrono::Utc;

use crate::auth::TokenService;
use crate::auth::password::{hash_password, verify_password};
use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::domain::types::{Email, Role};
use crate::domain::user::NewUser;
use crate::dto::auth::TokenDto;
use crate::forms::auth::{LoginFormPayload, RegisterFormPayload};
use crate::repository::{Outcome, UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

const USER_EXISTS: &str = "User with this username or email already exists";

fn create_account<R>(payload: RegisterFormPayload, role: Role, repo: &R) -> ServiceResult<()>
where
    R: UserReader + UserWriter,
{
    let taken = match (
        repo.get_user_by_username(&payload.username),
        repo.get_user_by_email(&payload.email),
    ) {
        (Ok(by_name), Ok(by_email)) => by_name.is_some() || by_email.is_some(),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    };
    if taken {
        return Err(ServiceError::Conflict(USER_EXISTS.to_string()));
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        log::error!("Failed to hash password: {e}");
        ServiceError::Internal
    })?;

    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        password_hash,
        created_at: Utc::now().naive_utc(),
    };

    let user = match repo.create_user(&new_user) {
        Ok(Outcome::Success(user)) => user,
        Ok(Outcome::Conflict) => return Err(ServiceError::Conflict(USER_EXISTS.to_string())),
        Ok(Outcome::NotFound) => return Err(ServiceError::Internal),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    // The account stays in place even if the role cannot be attached.
    match repo.assign_role(user.id, role) {
        Ok(Outcome::Success(())) => {
            log::info!("Registered {} with role {role}", user.email);
        }
        Ok(Outcome::Conflict | Outcome::NotFound) => {
            log::error!("Role {role} could not be assigned to {}", user.email);
        }
        Err(e) => {
            log::error!("Failed to assign role {role} to {}: {e}", user.email);
        }
    }

    Ok(())
}

/// Register a regular account with the `User` role.
pub fn register<R>(payload: RegisterFormPayload, repo: &R) -> ServiceResult<&'static str>
where
    R: UserReader + UserWriter,
{
    create_account(payload, Role::User, repo)?;
    Ok("User created successfully")
}

/// Register an administrator. Only an existing administrator may do this.
pub fn register_admin<R>(
    payload: RegisterFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<&'static str>
where
    R: UserReader + UserWriter,
{
    if !check_role(Role::Admin, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    create_account(payload, Role::Admin, repo)?;
    Ok("Admin created successfully")
}

/// Exchange credentials for a bearer token.
pub fn login<R>(
    payload: LoginFormPayload,
    repo: &R,
    tokens: &TokenService,
) -> ServiceResult<TokenDto>
where
    R: UserReader,
{
    log::info!("Login attempt: {}", payload.email);

    let user = match Email::new(payload.email.as_str()).map(|email| repo.get_user_by_email(&email)) {
        Ok(Ok(Some(user))) => user,
        Ok(Ok(None)) | Err(_) => {
            log::info!("Login failed, user not found.");
            return Err(ServiceError::InvalidCredentials);
        }
        Ok(Err(e)) => {
            log::error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if !verify_password(&user.password_hash, &payload.password) {
        log::info!("Login failed: wrong password");
        return Err(ServiceError::InvalidCredentials);
    }

    let token = tokens.create_token(&user, repo).map_err(|e| {
        log::error!("Failed to issue token: {e}");
        ServiceError::Internal
    })?;

    Ok(TokenDto { token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Username;
    use crate::models::config::JwtConfig;
    use crate::repository::test::TestRepository;

    fn payload(username: &str, email: &str) -> RegisterFormPayload {
        RegisterFormPayload {
            username: Username::new(username).unwrap(),
            email: Email::new(email).unwrap(),
            password: "Secret_1".into(),
        }
    }

    fn tokens() -> TokenService {
        TokenService::new(&JwtConfig {
            secret: "SuperSecretKey123SuperSuperSecure".into(),
            issuer: "library".into(),
            audience: "library-clients".into(),
        })
    }

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".into(),
            email: "admin@example.com".into(),
            name: "administrator".into(),
            roles: vec!["Admin".into()],
        }
    }

    #[test]
    fn register_assigns_user_role() {
        let repo = TestRepository::default();
        assert_eq!(
            register(payload("alice01", "alice@x.com"), &repo).unwrap(),
            "User created successfully"
        );

        let user = repo
            .get_user_by_email(&Email::new("alice@x.com").unwrap())
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash.as_str(), "Secret_1");
        assert_eq!(repo.list_user_roles(user.id).unwrap(), vec![Role::User]);
    }

    #[test]
    fn duplicate_username_or_email_conflicts() {
        let repo = TestRepository::default();
        register(payload("alice01", "alice@x.com"), &repo).unwrap();

        let expected = Err(ServiceError::Conflict(USER_EXISTS.to_string()));
        assert_eq!(register(payload("alice01", "other@x.com"), &repo), expected);
        assert_eq!(register(payload("other01", "alice@x.com"), &repo), expected);
        assert_eq!(repo.user_count(), 1);
    }

    #[test]
    fn failed_role_assignment_keeps_the_account() {
        let repo = TestRepository::default().failing_role_assignment();
        assert!(register(payload("alice01", "alice@x.com"), &repo).is_ok());
        assert_eq!(repo.user_count(), 1);
    }

    #[test]
    fn register_admin_requires_admin_caller() {
        let repo = TestRepository::default();
        let mut caller = admin();
        caller.roles = vec!["User".into()];
        assert_eq!(
            register_admin(payload("boss001", "boss@x.com"), &caller, &repo),
            Err(ServiceError::Unauthorized)
        );

        assert_eq!(
            register_admin(payload("boss001", "boss@x.com"), &admin(), &repo).unwrap(),
            "Admin created successfully"
        );
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let repo = TestRepository::default();
        register(payload("alice01", "alice@x.com"), &repo).unwrap();
        let tokens = tokens();

        let unknown = login(
            LoginFormPayload {
                email: "nobody@x.com".into(),
                password: "Secret_1".into(),
            },
            &repo,
            &tokens,
        )
        .unwrap_err();
        let wrong = login(
            LoginFormPayload {
                email: "alice@x.com".into(),
                password: "Wrong_123".into(),
            },
            &repo,
            &tokens,
        )
        .unwrap_err();

        assert_eq!(unknown, ServiceError::InvalidCredentials);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn login_issues_verifiable_token() {
        let repo = TestRepository::default();
        register(payload("alice01", "alice@x.com"), &repo).unwrap();
        let tokens = tokens();

        let dto = login(
            LoginFormPayload {
                email: "alice@x.com".into(),
                password: "Secret_1".into(),
            },
            &repo,
            &tokens,
        )
        .unwrap();

        let claims = tokens.verify_token(&dto.token).unwrap();
        assert_eq!(claims.name, "alice01");
        assert_eq!(claims.roles, vec!["User".to_string()]);
    }
}
