pub mod auth;
pub mod books;
pub mod categories;
pub mod errors;
pub mod user_books;

pub use errors::{ServiceError, ServiceResult};
