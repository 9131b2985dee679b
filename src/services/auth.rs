//! Authentication service implementation
//!
//! Account signup, credential verification and session lifecycle. The
//! request handlers only see opaque session tokens; everything else
//! lives here.

use tracing::{info, warn};

use crate::database::Database;
use crate::models::User;
use crate::services::session::SessionService;
use crate::utils::errors::{AppError, Result, ValidationErrors};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
    sessions: SessionService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(db: Database, sessions: SessionService, bcrypt_cost: u32) -> Self {
        Self {
            db,
            sessions,
            bcrypt_cost,
        }
    }

    /// Create a new account
    pub async fn signup(&self, username: &str, password: &str) -> Result<User> {
        validate_credentials(username, password)?;

        if self.db.users.find_by_username(username.trim()).await?.is_some() {
            let mut errors = ValidationErrors::new();
            errors.add("username", "This username is already taken.");
            return Err(AppError::Validation(errors));
        }

        let hash = bcrypt::hash(password, self.bcrypt_cost)?;
        let user = self.db.users.create(username.trim(), &hash).await?;

        info!(user_id = user.id, "User account created");
        Ok(user)
    }

    /// Verify credentials and mint a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String)> {
        let user = match self.db.users.find_by_username(username.trim()).await? {
            Some(user) => user,
            None => {
                warn!(username = %username, "Login attempt for unknown username");
                return Err(invalid_credentials());
            }
        };

        if !bcrypt::verify(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let token = self.sessions.create_session(user.id).await?;
        info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }

    /// Destroy the session behind a token
    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions.destroy(token).await?;
        Ok(())
    }

    /// Resolve a session token to its user, if the session is live
    pub async fn current_user(&self, token: &str) -> Result<Option<User>> {
        let user_id = match self.sessions.resolve(token).await? {
            Some(user_id) => user_id,
            None => return Ok(None),
        };

        self.db.users.find_by_id(user_id).await
    }
}

fn invalid_credentials() -> AppError {
    // One message for both failure modes; don't leak which part was wrong
    AppError::Authentication("Invalid username or password".to_string())
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    let mut errors = ValidationErrors::new();

    if username.trim().is_empty() {
        errors.add("username", "This field is required.");
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }

    errors.into_result(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_username_rejected() {
        let result = validate_credentials("  ", "long-enough-password");
        assert_matches!(result, Err(AppError::Validation(errors)) => {
            assert!(errors.fields.contains_key("username"));
        });
    }

    #[test]
    fn test_short_password_rejected() {
        let result = validate_credentials("alice", "short");
        assert_matches!(result, Err(AppError::Validation(errors)) => {
            assert!(errors.fields.contains_key("password"));
        });
    }

    #[test]
    fn test_valid_credentials_pass() {
        assert!(validate_credentials("alice", "long-enough-password").is_ok());
    }
}
