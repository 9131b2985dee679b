//! Gatherly community events service
//!
//! An HTTP service for a community events application: event listing
//! with search and category filtering, clamped pagination, event detail
//! with ownership/registration flags, ownership-gated editing, per-user
//! event views and registration management.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use database::Database;
pub use services::ServiceFactory;
pub use state::AppState;
pub use utils::errors::{AppError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
