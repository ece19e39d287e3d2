//! JSON response bodies. Field names are camelCase on the wire.

pub mod auth;
pub mod books;
pub mod categories;
pub mod user_books;
