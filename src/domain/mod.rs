//! Domain entities and value objects, independent of storage and HTTP.

pub mod auth;
pub mod book;
pub mod category;
pub mod types;
pub mod user;
pub mod user_book;
