//! Diesel row types and their conversions into domain entities.

pub mod book;
pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod user;
pub mod user_book;
