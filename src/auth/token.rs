//! Issuing and verifying signed bearer tokens.
//!
//! Tokens are HS256 JWTs valid for one hour. They are stateless: there is no
//! revocation list, so a token stays usable until `exp` even if the user's
//! roles change.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::User;
use crate::models::config::JwtConfig;
use crate::repository::{RepositoryError, UserReader};

/// Lifetime of an issued token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("failed to load roles: {0}")]
    Repository(#[from] RepositoryError),
}

/// Claims carried by every token.
///
/// `role` holds one entry per assigned role and is left out entirely when the
/// user has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub jti: String,
    #[serde(rename = "role", default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            sub: claims.sub,
            email: claims.email,
            name: claims.name,
            roles: claims.roles,
        }
    }
}

/// Signs and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Issue a token for `user`, embedding the roles currently assigned in
    /// the store.
    pub fn create_token<R>(&self, user: &User, repo: &R) -> Result<String, TokenError>
    where
        R: UserReader,
    {
        let roles: Vec<String> = repo
            .list_user_roles(user.id)?
            .into_iter()
            .map(|role| role.as_str().to_string())
            .collect();

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.username.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            roles,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        let token = self.sign(&claims)?;
        log::info!(
            "Issued token for {} with roles {:?}",
            claims.email,
            claims.roles
        );
        Ok(token)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding,
        )?)
    }

    /// Check signature, issuer, audience and expiry. Only HS256 is accepted.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::types::{Email, PasswordHash, Role, UserId, Username};
    use crate::repository::test::TestRepository;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: "library".into(),
            audience: "library-clients".into(),
        }
    }

    fn sample_user() -> User {
        User {
            id: UserId::new(1).unwrap(),
            username: Username::new("reader1").unwrap(),
            email: Email::new("reader@example.com").unwrap(),
            password_hash: PasswordHash::new("$argon2id$stub").unwrap(),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn service() -> TokenService {
        TokenService::new(&config("SuperSecretKey123SuperSuperSecure"))
    }

    #[test]
    fn issued_token_carries_identity_and_roles() {
        let repo = TestRepository::default().with_user(sample_user(), vec![Role::User]);
        let tokens = service();

        let token = tokens.create_token(&sample_user(), &repo).unwrap();
        let claims = tokens.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email, "reader@example.com");
        assert_eq!(claims.name, "reader1");
        assert_eq!(claims.roles, vec!["User".to_string()]);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn user_without_roles_gets_token_without_role_claim() {
        let repo = TestRepository::default().with_user(sample_user(), vec![]);
        let tokens = service();

        let token = tokens.create_token(&sample_user(), &repo).unwrap();
        let claims = tokens.verify_token(&token).unwrap();
        assert!(claims.roles.is_empty());

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("role").is_none());
    }

    #[test]
    fn every_token_gets_a_fresh_jti() {
        let repo = TestRepository::default().with_user(sample_user(), vec![Role::User]);
        let tokens = service();

        let a = tokens.verify_token(&tokens.create_token(&sample_user(), &repo).unwrap());
        let b = tokens.verify_token(&tokens.create_token(&sample_user(), &repo).unwrap());
        assert_ne!(a.unwrap().jti, b.unwrap().jti);
    }

    #[test]
    fn rejects_foreign_signature_issuer_and_audience() {
        let repo = TestRepository::default().with_user(sample_user(), vec![Role::User]);
        let tokens = service();

        let other_secret = TokenService::new(&config("AnotherSecretKey123AnotherSecure!"));
        let token = other_secret.create_token(&sample_user(), &repo).unwrap();
        assert!(tokens.verify_token(&token).is_err());

        let mut other_issuer = config("SuperSecretKey123SuperSuperSecure");
        other_issuer.issuer = "someone-else".into();
        let token = TokenService::new(&other_issuer)
            .create_token(&sample_user(), &repo)
            .unwrap();
        assert!(tokens.verify_token(&token).is_err());

        let mut other_audience = config("SuperSecretKey123SuperSuperSecure");
        other_audience.audience = "someone-else".into();
        let token = TokenService::new(&other_audience)
            .create_token(&sample_user(), &repo)
            .unwrap();
        assert!(tokens.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_expired_and_garbage_tokens() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let expired = Claims {
            sub: "1".into(),
            email: "reader@example.com".into(),
            name: "reader1".into(),
            jti: Uuid::new_v4().to_string(),
            roles: vec!["User".into()],
            iss: "library".into(),
            aud: "library-clients".into(),
            iat: now - 2 * TOKEN_TTL_SECS,
            exp: now - TOKEN_TTL_SECS,
        };
        let token = tokens.sign(&expired).unwrap();
        assert!(tokens.verify_token(&token).is_err());
        assert!(tokens.verify_token("not.a.token").is_err());
    }

    #[test]
    fn claims_convert_into_authenticated_user() {
        let repo = TestRepository::default().with_user(sample_user(), vec![Role::Admin]);
        let tokens = service();
        let claims = tokens
            .verify_token(&tokens.create_token(&sample_user(), &repo).unwrap())
            .unwrap();

        let user = AuthenticatedUser::from(claims);
        assert_eq!(user.user_id(), Some(UserId::new(1).unwrap()));
        assert_eq!(user.roles, vec!["Admin".to_string()]);
    }
}
