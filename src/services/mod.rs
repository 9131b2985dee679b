//! Business logic services
//!
//! This module contains the service layer sitting between the HTTP
//! handlers and the repositories.

pub mod auth;
pub mod event;
pub mod media;
pub mod session;

pub use auth::AuthService;
pub use event::{EventDisplay, EventFlags, EventListing, EventService};
pub use media::MediaStore;
pub use session::SessionService;

use crate::config::Settings;
use crate::database::Database;
use crate::utils::errors::Result;

/// Factory wiring every service from the loaded settings
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub auth: AuthService,
    pub events: EventService,
    pub sessions: SessionService,
}

impl ServiceFactory {
    pub fn new(settings: &Settings, db: Database) -> Result<Self> {
        let sessions = SessionService::new(settings)?;
        let media = MediaStore::new(&settings.media.root);
        let auth = AuthService::new(db.clone(), sessions.clone(), settings.auth.bcrypt_cost);
        let events = EventService::new(db, media, settings.pagination.events_per_page);

        Ok(Self {
            auth,
            events,
            sessions,
        })
    }
}
