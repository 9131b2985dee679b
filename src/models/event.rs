//! Event model and edit form

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{Result, ValidationErrors};

/// Date format accepted by the event edit form
const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: String,
    pub image: Option<String>,
    pub category_id: i64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw edit-form fields as submitted (all strings, straight off the wire)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    pub event_name: String,
    pub start_date: String,
    pub end_date: String,
    pub event_description: String,
    pub location: String,
    pub event_category: String,
}

/// Validated edit-form values ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEventForm {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub location: String,
    pub category_id: i64,
}

impl EventForm {
    /// Pre-fill the form from an existing event (the GET half of the
    /// edit flow).
    pub fn initial(event: &Event) -> Self {
        Self {
            event_name: event.name.clone(),
            start_date: event.start_date.format(FORM_DATE_FORMAT).to_string(),
            end_date: event.end_date.format(FORM_DATE_FORMAT).to_string(),
            event_description: event.description.clone(),
            location: event.location.clone(),
            event_category: event.category_id.to_string(),
        }
    }

    /// Validate the submitted fields. Collects every field error before
    /// failing so the form can be re-rendered with all of them at once.
    pub fn validate(&self) -> Result<ValidatedEventForm> {
        let mut errors = ValidationErrors::new();

        let name = self.event_name.trim();
        if name.is_empty() {
            errors.add("event_name", "This field is required.");
        }

        let start_date = parse_form_date(&self.start_date);
        if start_date.is_none() {
            errors.add("start_date", "Enter a valid date.");
        }

        let end_date = parse_form_date(&self.end_date);
        if end_date.is_none() {
            errors.add("end_date", "Enter a valid date.");
        }

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add("end_date", "End date cannot be before start date.");
            }
        }

        let location = self.location.trim();
        if location.is_empty() {
            errors.add("location", "This field is required.");
        }

        let category_id = self.event_category.trim().parse::<i64>().ok();
        if category_id.is_none() {
            errors.add("event_category", "Select a valid category.");
        }

        let validated = ValidatedEventForm {
            name: name.to_string(),
            start_date: start_date.unwrap_or_default(),
            end_date: end_date.unwrap_or_default(),
            description: self.event_description.trim().to_string(),
            location: location.to_string(),
            category_id: category_id.unwrap_or_default(),
        };

        errors.into_result(validated)
    }
}

fn parse_form_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), FORM_DATE_FORMAT).ok()
}

/// Search-box date format, e.g. "Nov. 05, 2024"
const SEARCH_DATE_FORMAT: &str = "%b. %d, %Y";

/// How a search query filters the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// The query parsed as a date; match events starting or ending on it
    Date(NaiveDate),
    /// Anything else; case-insensitive substring match on the name
    Name(String),
}

impl SearchFilter {
    /// A query that parses as a `"%b. %d, %Y"` date filters by date;
    /// everything else falls back to a name search.
    pub fn parse(query: &str) -> Self {
        match NaiveDate::parse_from_str(query.trim(), SEARCH_DATE_FORMAT) {
            Ok(date) => SearchFilter::Date(date),
            Err(_) => SearchFilter::Name(query.to_string()),
        }
    }
}

/// Combined listing filter: optional search plus optional category
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub search: Option<SearchFilter>,
    pub category_id: Option<i64>,
}

/// An uploaded replacement image
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What to do with the stored image when an event is updated
#[derive(Debug, Clone)]
pub enum ImageChange {
    /// Explicit clear requested; any stored file is removed
    Clear,
    /// A new file was uploaded; it replaces the stored one
    Replace(ImageUpload),
    /// Neither clear nor upload; the stored image is untouched
    Keep,
}

impl ImageChange {
    /// The clear sentinel wins over a simultaneous upload.
    pub fn decide(clear_requested: bool, upload: Option<ImageUpload>) -> Self {
        if clear_requested {
            ImageChange::Clear
        } else if let Some(upload) = upload {
            ImageChange::Replace(upload)
        } else {
            ImageChange::Keep
        }
    }
}
