//! Shared application state handed to every handler

use crate::config::Settings;
use crate::database::Database;
use crate::services::ServiceFactory;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub db: Database,
    pub services: ServiceFactory,
}

impl AppState {
    pub fn new(settings: Settings, db: Database, services: ServiceFactory) -> Self {
        Self {
            settings,
            db,
            services,
        }
    }
}
