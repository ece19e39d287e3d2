use std::future::{Ready, ready};

use actix_web::body::MessageBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, web};

use crate::auth::policy::{Access, required_access};
use crate::auth::token::TokenService;
use crate::domain::auth::{AuthenticatedUser, check_role};

const UNAUTHORIZED: &str = "Unauthorized";

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authorization gate, mounted with `actix_web::middleware::from_fn`.
///
/// Routes marked public in the policy table pass through untouched. Every
/// other route needs a valid bearer token carrying the required role; any
/// failure, including a missing role, answers 401.
pub async fn authorize(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let role = match required_access(req.method().as_str(), req.path()) {
        Access::Public => return Ok(next.call(req).await?.map_into_left_body()),
        Access::Role(role) => role,
    };

    let Some(tokens) = req.app_data::<web::Data<TokenService>>().cloned() else {
        log::error!("TokenService is not registered as app data");
        return Err(ErrorInternalServerError(""));
    };

    let verified = bearer_token(&req).map(|token| tokens.verify_token(token));
    let claims = match verified {
        Some(Ok(claims)) => claims,
        Some(Err(e)) => {
            log::warn!("Rejected token for {} {}: {e}", req.method(), req.path());
            return Ok(req
                .into_response(HttpResponse::Unauthorized().json(UNAUTHORIZED))
                .map_into_right_body());
        }
        None => {
            return Ok(req
                .into_response(HttpResponse::Unauthorized().json(UNAUTHORIZED))
                .map_into_right_body());
        }
    };

    if !check_role(role, &claims.roles) {
        log::warn!(
            "{} lacks role {role} for {} {}",
            claims.email,
            req.method(),
            req.path()
        );
        return Ok(req
            .into_response(HttpResponse::Unauthorized().json(UNAUTHORIZED))
            .map_into_right_body());
    }

    req.extensions_mut().insert(AuthenticatedUser::from(claims));
    Ok(next.call(req).await?.map_into_left_body())
}

/// Reads the caller identity stored by [`authorize`].
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized(UNAUTHORIZED)),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::middleware::from_fn;
    use actix_web::{App, get, test};

    use super::*;
    use crate::domain::types::{Email, PasswordHash, Role, UserId, Username};
    use crate::domain::user::User;
    use crate::models::config::JwtConfig;
    use crate::repository::test::TestRepository;

    #[get("/api/userbook")]
    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().json(user.name)
    }

    fn tokens() -> TokenService {
        TokenService::new(&JwtConfig {
            secret: "SuperSecretKey123SuperSuperSecure".into(),
            issuer: "library".into(),
            audience: "library-clients".into(),
        })
    }

    fn reader() -> User {
        User {
            id: UserId::new(1).unwrap(),
            username: Username::new("reader1").unwrap(),
            email: Email::new("reader@example.com").unwrap(),
            password_hash: PasswordHash::new("$argon2id$stub").unwrap(),
            created_at: chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[actix_web::test]
    async fn gate_attaches_caller_for_extractor() {
        let tokens = tokens();
        let repo = TestRepository::default().with_user(reader(), vec![Role::User]);
        let token = tokens.create_token(&reader(), &repo).unwrap();

        let app = test::init_service(
            App::new()
                .wrap(from_fn(authorize))
                .app_data(web::Data::new(tokens))
                .service(whoami),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/userbook")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: String = test::read_body_json(resp).await;
        assert_eq!(body, "reader1");

        let req = test::TestRequest::get().uri("/api/userbook").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
