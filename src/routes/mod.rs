//! HTTP handlers. Each handler parses the request, calls one service
//! function and maps the result to a status code.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};

use crate::services::ServiceError;

pub mod authenticate;
pub mod book;
pub mod category;
pub mod userbook;

/// Translate a service failure into a response. Client errors carry a JSON
/// string body; internal errors carry nothing.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json("Unauthorized"),
        ServiceError::InvalidCredentials => {
            HttpResponse::Unauthorized().json(ServiceError::InvalidCredentials.to_string())
        }
        ServiceError::NotFound(message) => HttpResponse::NotFound().json(message),
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(message),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(message),
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}

/// Register every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(err, HttpResponse::BadRequest().json(message)).into()
    });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .service(authenticate::register)
            .service(authenticate::register_admin)
            .service(authenticate::login)
            .service(book::list_books)
            .service(book::get_book)
            .service(book::create_book)
            .service(book::update_book)
            .service(book::delete_book)
            .service(category::list_categories)
            .service(category::get_category)
            .service(category::create_category)
            .service(category::update_category)
            .service(category::delete_category)
            .service(userbook::list_user_books)
            .service(userbook::add_user_book)
            .service(userbook::remove_user_book),
    );
}
