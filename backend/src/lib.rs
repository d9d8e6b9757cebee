//! User-account REST API backend.
//!
//! Provides registration, login, email verification, password reset, token
//! refresh/logout with a denylist, and profile management on top of SQLite.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod router;
pub mod services;
pub mod utils;
