//! Event registration repository implementation

use sqlx::PgPool;

use crate::models::EventRegistration;
use crate::utils::errors::AppError;

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for an event. The unique (event, user) constraint
    /// turns a duplicate registration into an input error.
    pub async fn create(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<EventRegistration, AppError> {
        let result = sqlx::query_as::<_, EventRegistration>(
            r#"
            INSERT INTO event_registrations (event_id, user_id)
            VALUES ($1, $2)
            RETURNING id, event_id, user_id, registered_at
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(registration) => Ok(registration),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                AppError::InvalidInput("Already registered for this event".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Find a user's registration for an event
    pub async fn find(
        &self,
        event_id: i64,
        user_id: i64,
    ) -> Result<Option<EventRegistration>, AppError> {
        let registration = sqlx::query_as::<_, EventRegistration>(
            "SELECT id, event_id, user_id, registered_at FROM event_registrations \
             WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Check if user is registered for event
    pub async fn is_registered(&self, event_id: i64, user_id: i64) -> Result<bool, AppError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Delete a user's registration for an event
    pub async fn delete(&self, event_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM event_registrations WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
