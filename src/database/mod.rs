//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;

use crate::database::connection::DatabasePool;

pub use connection::{create_pool, health_check, run_migrations, DatabaseConfig};
pub use repositories::{CategoryRepository, EventRepository, RegistrationRepository, UserRepository};

/// High-level facade over the per-aggregate repositories
#[derive(Debug, Clone)]
pub struct Database {
    pub users: UserRepository,
    pub events: EventRepository,
    pub categories: CategoryRepository,
    pub registrations: RegistrationRepository,
    pool: DatabasePool,
}

impl Database {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn health_check(&self) -> Result<(), crate::utils::errors::AppError> {
        connection::health_check(&self.pool).await
    }
}
