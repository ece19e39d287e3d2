use actix_web::http::header;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::categories::{CategoryForm, CategoryFormPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::ServiceError;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    get_category as get_category_service, list_categories as list_categories_service,
    update_category as update_category_service,
};

#[get("/category")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match list_categories_service(repo.get_ref()) {
        Ok(categories) if categories.is_empty() => HttpResponse::NoContent().finish(),
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(err),
    }
}

#[get("/category/{category_id}")]
pub async fn get_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_category_service(category_id.into_inner(), &user, repo.get_ref()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(err),
    }
}

#[post("/category")]
pub async fn create_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match create_category_service(payload, &user, repo.get_ref()) {
        Ok(category) => HttpResponse::Created()
            .insert_header((header::LOCATION, format!("/api/category/{}", category.id)))
            .json(category),
        Err(err) => error_response(err),
    }
}

#[put("/category/{category_id}")]
pub async fn update_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<CategoryForm>,
) -> impl Responder {
    let payload: CategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return error_response(ServiceError::from(e)),
    };

    match update_category_service(category_id.into_inner(), payload, &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[delete("/category/{category_id}")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_category_service(category_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}
