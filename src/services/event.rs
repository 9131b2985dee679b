//! Event service implementation
//!
//! Orchestrates the listing, detail, per-user and mutation flows on top
//! of the repositories: search filter construction, clamped pagination,
//! view-flag computation, and the image replacement decision on update.

use serde::Serialize;

use crate::database::Database;
use crate::models::{
    Event, EventCategory, EventFilter, EventForm, ImageChange, SearchFilter, ValidatedEventForm,
};
use crate::services::media::MediaStore;
use crate::utils::errors::{AppError, Result, ValidationErrors};
use crate::utils::logging::{log_event_action, log_non_creator_mutation};
use crate::utils::pagination::{Page, PageRequest};

/// Flags controlling the detail page UI for a particular viewer
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct EventFlags {
    /// Edit/delete controls are disabled for everyone but the creator
    pub disable_flag: bool,
    /// Registration UI is hidden for the creator and for registered users
    pub register_flag: bool,
    pub is_registered: bool,
}

impl EventFlags {
    /// The creator counts as registered even without a registration row.
    pub fn compute(creator_id: i64, viewer: Option<i64>, is_registered: bool) -> Self {
        let is_creator = viewer == Some(creator_id);
        Self {
            disable_flag: !is_creator,
            register_flag: is_creator || is_registered,
            is_registered,
        }
    }
}

/// Which of a user's event lists to show: an explicit tagged choice,
/// never a truthiness fallback between the two query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDisplay {
    Created,
    Registered,
}

impl EventDisplay {
    /// `registered` selects registrations; anything else is `created`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("registered") => EventDisplay::Registered,
            _ => EventDisplay::Created,
        }
    }
}

/// Listing page context: one page of events plus the filter state
#[derive(Debug, Clone, Serialize)]
pub struct EventListing {
    pub events: Page<Event>,
    pub query: Option<String>,
    pub categories: Vec<EventCategory>,
    pub selected_category: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct EventService {
    db: Database,
    media: MediaStore,
    events_per_page: i64,
}

impl EventService {
    pub fn new(db: Database, media: MediaStore, events_per_page: i64) -> Self {
        Self {
            db,
            media,
            events_per_page,
        }
    }

    /// Main listing: optional search (date or name), optional category,
    /// clamped pagination.
    pub async fn list_events(
        &self,
        query: Option<&str>,
        category_id: Option<i64>,
        page: Option<&str>,
    ) -> Result<EventListing> {
        let search = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(SearchFilter::parse);
        let filter = EventFilter {
            search,
            category_id,
        };

        let total = self.db.events.count_filtered(&filter).await?;
        let request = PageRequest::clamped(page, total, self.events_per_page);
        let items = self
            .db
            .events
            .list_filtered(&filter, request.limit(), request.offset())
            .await?;

        let categories = self.db.categories.list_all().await?;

        Ok(EventListing {
            events: Page::new(items, request, total),
            query: query.map(str::to_string),
            categories,
            selected_category: category_id,
        })
    }

    /// Past events: ended strictly before today, most recent first
    pub async fn past_events(&self, page: Option<&str>) -> Result<Page<Event>> {
        let total = self.db.events.count_past().await?;
        let request = PageRequest::clamped(page, total, self.events_per_page);
        let items = self
            .db
            .events
            .list_past(request.limit(), request.offset())
            .await?;

        Ok(Page::new(items, request, total))
    }

    /// Fetch one event with the viewer's flags
    pub async fn detail(&self, event_id: i64, viewer: Option<i64>) -> Result<(Event, EventFlags)> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        let is_registered = match viewer {
            Some(user_id) => self.db.registrations.is_registered(event_id, user_id).await?,
            None => false,
        };

        let flags = EventFlags::compute(event.created_by, viewer, is_registered);
        Ok((event, flags))
    }

    /// The selected variant of a user's events, never both
    pub async fn my_events(&self, user_id: i64, display: EventDisplay) -> Result<Vec<Event>> {
        match display {
            EventDisplay::Created => self.db.events.list_created_by(user_id).await,
            EventDisplay::Registered => self.db.events.list_registered_for(user_id).await,
        }
    }

    /// The edit form pre-filled from the stored event
    pub async fn edit_form(&self, event_id: i64) -> Result<EventForm> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        Ok(EventForm::initial(&event))
    }

    /// Apply a submitted edit form. The target event must exist before
    /// the form is even validated; invalid input fails before any
    /// mutation, and the image decision runs only after the field
    /// update succeeded.
    pub async fn update_event(
        &self,
        event_id: i64,
        actor_id: i64,
        form: &EventForm,
        image: ImageChange,
    ) -> Result<Event> {
        let existing = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        let validated = form.validate()?;
        self.check_category(&validated).await?;

        if existing.created_by != actor_id {
            log_non_creator_mutation(event_id, "update", actor_id, existing.created_by);
        }

        let mut event = self.db.events.update(event_id, &validated).await?;
        self.apply_image_change(event_id, existing.image.as_deref(), image, &mut event)
            .await?;

        log_event_action(event_id, "update", actor_id, None);
        Ok(event)
    }

    /// The row is repointed before the superseded file is removed, so a
    /// failure partway through never leaves the row referencing a file
    /// that is already gone.
    async fn apply_image_change(
        &self,
        event_id: i64,
        previous: Option<&str>,
        change: ImageChange,
        event: &mut Event,
    ) -> Result<()> {
        match change {
            ImageChange::Clear => {
                self.db.events.set_image(event_id, None).await?;
                event.image = None;
                if let Some(old) = previous {
                    self.media.remove(old).await?;
                }
            }
            ImageChange::Replace(upload) => {
                let stored = self.media.store(&upload).await?;
                self.db.events.set_image(event_id, Some(stored.as_str())).await?;
                event.image = Some(stored);
                if let Some(old) = previous {
                    self.media.remove(old).await?;
                }
            }
            ImageChange::Keep => {}
        }

        Ok(())
    }

    /// Delete an event along with its stored image
    pub async fn delete_event(&self, event_id: i64, actor_id: i64) -> Result<()> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })?;

        if event.created_by != actor_id {
            log_non_creator_mutation(event_id, "delete", actor_id, event.created_by);
        }

        // Row first; a leaked file beats a row pointing at nothing
        self.db.events.delete(event_id).await?;
        if let Some(image) = &event.image {
            self.media.remove(image).await?;
        }

        log_event_action(event_id, "delete", actor_id, None);
        Ok(())
    }

    /// Register the user for an event
    pub async fn register(&self, event_id: i64, user_id: i64) -> Result<()> {
        if self.db.events.find_by_id(event_id).await?.is_none() {
            return Err(AppError::EventNotFound { event_id });
        }

        self.db.registrations.create(event_id, user_id).await?;
        log_event_action(event_id, "register", user_id, None);
        Ok(())
    }

    /// Cancel the requester's registration; 404 when none exists
    pub async fn cancel_registration(&self, event_id: i64, user_id: i64) -> Result<()> {
        if self.db.events.find_by_id(event_id).await?.is_none() {
            return Err(AppError::EventNotFound { event_id });
        }

        self.db
            .registrations
            .find(event_id, user_id)
            .await?
            .ok_or(AppError::RegistrationNotFound { event_id, user_id })?;

        self.db.registrations.delete(event_id, user_id).await?;
        log_event_action(event_id, "cancel_registration", user_id, None);
        Ok(())
    }

    /// A category id that points nowhere is a form error, not a 404
    async fn check_category(&self, form: &ValidatedEventForm) -> Result<()> {
        if self.db.categories.exists(form.category_id).await? {
            Ok(())
        } else {
            let mut errors = ValidationErrors::new();
            errors.add("event_category", "Select a valid category.");
            Err(AppError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_flags() {
        let flags = EventFlags::compute(1, Some(1), false);
        assert!(!flags.disable_flag);
        assert!(flags.register_flag);
        assert!(!flags.is_registered);
    }

    #[test]
    fn test_unrelated_viewer_flags() {
        let flags = EventFlags::compute(1, Some(2), false);
        assert!(flags.disable_flag);
        assert!(!flags.register_flag);
    }

    #[test]
    fn test_registered_viewer_flags() {
        let flags = EventFlags::compute(1, Some(2), true);
        assert!(flags.disable_flag);
        assert!(flags.register_flag);
        assert!(flags.is_registered);
    }

    #[test]
    fn test_anonymous_viewer_flags() {
        let flags = EventFlags::compute(1, None, false);
        assert!(flags.disable_flag);
        assert!(!flags.register_flag);
    }

    #[test]
    fn test_display_parse_is_tagged() {
        assert_eq!(EventDisplay::parse(Some("registered")), EventDisplay::Registered);
        assert_eq!(EventDisplay::parse(Some("created")), EventDisplay::Created);
        assert_eq!(EventDisplay::parse(Some("bogus")), EventDisplay::Created);
        assert_eq!(EventDisplay::parse(None), EventDisplay::Created);
    }

    mod flows {
        use super::super::*;
        use std::path::Path;

        use assert_matches::assert_matches;
        use chrono::{NaiveDate, Utc};
        use tempfile::TempDir;

        use crate::database::Database;
        use crate::models::ImageUpload;

        /// A service over a pool that refuses every connection, so any
        /// path that touches the database fails in a recognizable way.
        fn unreachable_service(media_root: &Path) -> EventService {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .connect_lazy("postgresql://127.0.0.1:1/gatherly")
                .expect("lazy pool");
            EventService::new(Database::new(pool), MediaStore::new(media_root), 5)
        }

        fn sample_event(image: Option<&str>) -> Event {
            Event {
                id: 1,
                name: "Beach cleanup".to_string(),
                description: "Bring gloves".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                location: "Pier 3".to_string(),
                image: image.map(str::to_string),
                category_id: 1,
                created_by: 1,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }
        }

        #[tokio::test]
        async fn test_update_looks_up_event_before_validating() {
            let dir = TempDir::new().unwrap();
            let service = unreachable_service(dir.path());

            // An empty form would fail validation; the existence lookup
            // has to run first, so the error comes from storage.
            let err = service
                .update_event(1, 1, &EventForm::default(), ImageChange::Keep)
                .await
                .unwrap_err();

            assert_matches!(err, AppError::Database(_));
        }

        #[tokio::test]
        async fn test_replace_keeps_old_file_until_row_repointed() {
            let dir = TempDir::new().unwrap();
            let old_path = dir.path().join("old.png");
            tokio::fs::write(&old_path, b"old").await.unwrap();

            let service = unreachable_service(dir.path());
            let mut event = sample_event(Some("old.png"));
            let upload = ImageUpload {
                file_name: "new.png".to_string(),
                bytes: b"new".to_vec(),
            };

            let result = service
                .apply_image_change(1, Some("old.png"), ImageChange::Replace(upload), &mut event)
                .await;

            // Repointing the row failed, so the file it references must
            // still exist and the in-memory event must be untouched.
            assert!(result.is_err());
            assert!(old_path.exists());
            assert_eq!(event.image.as_deref(), Some("old.png"));
        }

        #[tokio::test]
        async fn test_clear_keeps_old_file_until_row_repointed() {
            let dir = TempDir::new().unwrap();
            let old_path = dir.path().join("old.png");
            tokio::fs::write(&old_path, b"old").await.unwrap();

            let service = unreachable_service(dir.path());
            let mut event = sample_event(Some("old.png"));

            let result = service
                .apply_image_change(1, Some("old.png"), ImageChange::Clear, &mut event)
                .await;

            assert!(result.is_err());
            assert!(old_path.exists());
            assert_eq!(event.image.as_deref(), Some("old.png"));
        }
    }
}
