//! Core library exports for the personal library service.
//!
//! The `data` feature exposes the persistence and domain layer (`db`,
//! `domain`, `models`, `schema`). The `server` feature adds repositories,
//! authentication, forms, services and the Actix-web routes.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod bootstrap;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
