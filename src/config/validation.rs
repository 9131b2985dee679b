//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{AppError, Result};

use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_media_config(&settings.media)?;
    validate_pagination_config(&settings.pagination)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(AppError::Config("Server host is required".to_string()));
    }

    Ok(())
}

fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AppError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(AppError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(AppError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AppError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.session_cookie.is_empty() {
        return Err(AppError::Config(
            "Session cookie name is required".to_string(),
        ));
    }

    if config.session_ttl_seconds == 0 {
        return Err(AppError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    // bcrypt rejects costs outside 4..=31
    if config.bcrypt_cost < 4 || config.bcrypt_cost > 31 {
        return Err(AppError::Config(
            "Bcrypt cost must be between 4 and 31".to_string(),
        ));
    }

    Ok(())
}

fn validate_media_config(config: &super::MediaConfig) -> Result<()> {
    if config.root.is_empty() {
        return Err(AppError::Config("Media root is required".to_string()));
    }

    Ok(())
}

fn validate_pagination_config(config: &super::PaginationConfig) -> Result<()> {
    if config.events_per_page <= 0 {
        return Err(AppError::Config(
            "Events per page must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AppError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AppError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_empty_database_url_rejected() {
        let mut settings = Settings::default();
        settings.database.url = String::new();
        assert!(matches!(
            validate_settings(&settings),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_min_connections_above_max_rejected() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_session_ttl_rejected() {
        let mut settings = Settings::default();
        settings.auth.session_ttl_seconds = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_events_per_page_rejected() {
        let mut settings = Settings::default();
        settings.pagination.events_per_page = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
