//! AgriLink Farm Services Coordination Server
//!
//! A Rust implementation of the AgriLink coordination core, providing a
//! REST JSON API for equipment rental booking, maintenance scheduling,
//! supply stock reservation and real-time booking notifications.

use std::sync::Arc;

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
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
