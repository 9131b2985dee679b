//! Event category model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Read-only label used to filter and display events
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventCategory {
    pub id: i64,
    pub label: String,
}
