//! Event category repository implementation

use sqlx::PgPool;

use crate::models::EventCategory;
use crate::utils::errors::AppError;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories for the listing page filter
    pub async fn list_all(&self) -> Result<Vec<EventCategory>, AppError> {
        let categories = sqlx::query_as::<_, EventCategory>(
            "SELECT id, label FROM event_categories ORDER BY label ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Check that a category id refers to an existing category
    pub async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM event_categories WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0 > 0)
    }
}
