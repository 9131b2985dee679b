//! Error handling for gatherly
//!
//! This module defines the main error type used throughout the application
//! and its mapping onto HTTP responses.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::utils::response;

/// Main error type for the gatherly application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Category not found: {category_id}")]
    CategoryNotFound { category_id: i64 },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Registration not found for event {event_id} and user {user_id}")]
    RegistrationNotFound { event_id: i64, user_id: i64 },

    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Field-level validation errors collected from a submitted form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.insert(field.to_string(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finish validation: `Ok(value)` when no field errors were recorded
    pub fn into_result<T>(self, value: T) -> Result<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self))
        }
    }
}

/// Result type alias for gatherly operations
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::EventNotFound { .. }
            | AppError::CategoryNotFound { .. }
            | AppError::UserNotFound { .. }
            | AppError::RegistrationNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Migration(_) => "MIGRATION_ERROR",
            AppError::Redis(_) => "REDIS_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::PasswordHash(_) => "PASSWORD_HASH_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::EventNotFound { .. }
            | AppError::CategoryNotFound { .. }
            | AppError::UserNotFound { .. }
            | AppError::RegistrationNotFound { .. } => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authentication(_) => "AUTH_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Internal failure classes keep their details in the log only
        let (message, details) = match &self {
            AppError::Validation(errors) => (
                "Validation failed".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            AppError::EventNotFound { .. }
            | AppError::CategoryNotFound { .. }
            | AppError::UserNotFound { .. }
            | AppError::RegistrationNotFound { .. }
            | AppError::Authentication(_)
            | AppError::InvalidInput(_) => (self.to_string(), None),
            _ => {
                error!(error = ?self, "Internal server error");
                ("Internal server error".to_string(), None)
            }
        };

        response::error(code, message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = AppError::EventNotFound { event_id: 7 };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_validation_errors_collects_fields() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());
        errors.add("event_name", "This field is required.");
        assert!(!errors.is_empty());
        assert_eq!(
            errors.fields.get("event_name").map(String::as_str),
            Some("This field is required.")
        );
    }

    #[test]
    fn test_into_result_rejects_on_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("start_date", "Enter a valid date.");
        let result = errors.into_result(());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
