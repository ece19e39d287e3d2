use actix_web::{HttpResponse, Responder, delete, get, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::user_books::{
    add_user_book as add_user_book_service, list_user_books as list_user_books_service,
    remove_user_book as remove_user_book_service,
};

#[get("/userbook")]
pub async fn list_user_books(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_user_books_service(&user, repo.get_ref()) {
        Ok(books) if books.is_empty() => HttpResponse::NoContent().finish(),
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => error_response(err),
    }
}

#[post("/userbook/{book_id}")]
pub async fn add_user_book(
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match add_user_book_service(book_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => error_response(err),
    }
}

#[delete("/userbook/{book_id}")]
pub async fn remove_user_book(
    book_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_user_book_service(book_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => error_response(err),
    }
}
