//! Library server
//!
//! Catalog, ratings and the reservation engine that keeps each book's shelf
//! count, availability flag and waiting queue consistent under concurrent
//! requests from any number of server processes.

use std::sync::Arc;

use sqlx::PgPool;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
    pub pool: PgPool,
}
