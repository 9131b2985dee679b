//! Event repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::{Event, EventFilter, SearchFilter, ValidatedEventForm};
use crate::utils::errors::AppError;

const EVENT_COLUMNS: &str = "id, name, description, start_date, end_date, location, image, \
     category_id, created_by, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Count events matching the listing filter
    pub async fn count_filtered(&self, filter: &EventFilter) -> Result<i64, AppError> {
        let (date, pattern) = filter_binds(filter);
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM events
            WHERE ($1::date IS NULL OR start_date = $1 OR end_date = $1)
              AND ($2::text IS NULL OR name ILIKE $2)
              AND ($3::bigint IS NULL OR category_id = $3)
            "#,
        )
        .bind(date)
        .bind(pattern)
        .bind(filter.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// One page of events matching the listing filter
    pub async fn list_filtered(
        &self,
        filter: &EventFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, AppError> {
        let (date, pattern) = filter_binds(filter);
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE ($1::date IS NULL OR start_date = $1 OR end_date = $1)
              AND ($2::text IS NULL OR name ILIKE $2)
              AND ($3::bigint IS NULL OR category_id = $3)
            ORDER BY id ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(date)
        .bind(pattern)
        .bind(filter.category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count events whose end date is strictly in the past
    pub async fn count_past(&self) -> Result<i64, AppError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM events WHERE end_date < CURRENT_DATE")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// One page of past events, most recently ended first
    pub async fn list_past(&self, limit: i64, offset: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE end_date < CURRENT_DATE
            ORDER BY end_date DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events created by a user
    pub async fn list_created_by(&self, user_id: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE created_by = $1 ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events a user holds a registration for
    pub async fn list_registered_for(&self, user_id: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {} FROM events e
            INNER JOIN event_registrations r ON e.id = r.event_id
            WHERE r.user_id = $1
            ORDER BY e.id ASC
            "#,
            event_columns_qualified("e")
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Overwrite the editable fields of an event
    pub async fn update(&self, id: i64, form: &ValidatedEventForm) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = $2,
                start_date = $3,
                end_date = $4,
                description = $5,
                location = $6,
                category_id = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&form.name)
        .bind(form.start_date)
        .bind(form.end_date)
        .bind(&form.description)
        .bind(&form.location)
        .bind(form.category_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        event.ok_or(AppError::EventNotFound { event_id: id })
    }

    /// Set or clear the stored image path
    pub async fn set_image(&self, id: i64, image: Option<&str>) -> Result<(), AppError> {
        sqlx::query("UPDATE events SET image = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(image)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete event; registrations cascade
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn filter_binds(filter: &EventFilter) -> (Option<NaiveDate>, Option<String>) {
    match &filter.search {
        Some(SearchFilter::Date(date)) => (Some(*date), None),
        Some(SearchFilter::Name(name)) => (None, Some(like_pattern(name))),
        None => (None, None),
    }
}

/// Wrap a user query in `%...%`, escaping the ILIKE metacharacters so
/// the input is matched literally.
fn like_pattern(raw: &str) -> String {
    let escaped = raw
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn event_columns_qualified(alias: &str) -> String {
    EVENT_COLUMNS
        .split(", ")
        .map(|col| format!("{alias}.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("clean"), "%clean%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_filter_binds_for_date_search() {
        let filter = EventFilter {
            search: Some(SearchFilter::Date(
                NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
            )),
            category_id: None,
        };
        let (date, pattern) = filter_binds(&filter);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 11, 5));
        assert!(pattern.is_none());
    }

    #[test]
    fn test_filter_binds_for_name_search() {
        let filter = EventFilter {
            search: Some(SearchFilter::Name("park".to_string())),
            category_id: Some(3),
        };
        let (date, pattern) = filter_binds(&filter);
        assert!(date.is_none());
        assert_eq!(pattern.as_deref(), Some("%park%"));
    }

    #[test]
    fn test_qualified_columns() {
        let columns = event_columns_qualified("e");
        assert!(columns.starts_with("e.id, e.name"));
        assert!(columns.ends_with("e.updated_at"));
    }
}
