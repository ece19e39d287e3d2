use actix_web::http::header;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::books::{BookForm, BookFormPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::books::{
    create_book as create_book_service, delete_book as delete_book_service,
    get_book as get_book_service, list_books as list_books_service,
    update_book as update_book_service,
};

#[get("/book")]
pub async fn list_books(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_books_service(repo.get_ref()) {
        Ok(books) if books.is_empty() => HttpResponse::NoContent().finish(),
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => error_response(err),
    }
}

#[get("/book/{book_id}")]
pub async fn get_book(
    book_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_book_service(book_id.into_inner(), repo.get_ref()) {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) => error_response(err),
    }
}

#[post("/book")]
pub async fn create_book(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BookForm>,
) -> impl Responder {
    let payload: BookFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_book_service(payload, &user, repo.get_ref()) {
        Ok(book) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/book/{}", book.id)))
            .json(book),
        Err(err) => error_response(err),
    }
}

#[put("/book/{book_id}")]
pub async fn update_book(
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<BookForm>,
) -> impl Responder {
    let payload: BookFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_book_service(book_id.into_inner(), payload, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[delete("/book/{book_id}")]
pub async fn delete_book(
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_book_service(book_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
