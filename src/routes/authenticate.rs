use actix_web::{HttpResponse, Responder, post, web};

use crate::auth::TokenService;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, LoginFormPayload, RegisterForm, RegisterFormPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::auth::{
    login as login_service, register as register_service,
    register_admin as register_admin_service,
};

#[post("/authenticate/register")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterForm>,
) -> impl Responder {
    let payload: RegisterFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match register_service(payload, repo.get_ref()) {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(err) => error_response(err),
    }
}

#[post("/authenticate/register-admin")]
pub async fn register_admin(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<RegisterForm>,
) -> impl Responder {
    let payload: RegisterFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match register_admin_service(payload, &user, repo.get_ref()) {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(err) => error_response(err),
    }
}

#[post("/authenticate/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    tokens: web::Data<TokenService>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    let payload: LoginFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match login_service(payload, repo.get_ref(), tokens.get_ref()) {
        Ok(token) => HttpResponse::Ok().json(token),
        Err(err) => error_response(err),
    }
}
