//! Redis-backed login sessions
//!
//! Sessions map an opaque token (carried in a cookie) to a user id.
//! Tokens expire server-side via Redis TTLs; logout deletes them.

use rand::Rng;
use redis::{AsyncCommands, Client};
use tracing::debug;

use crate::config::Settings;
use crate::utils::errors::{AppError, Result};

const TOKEN_LENGTH: usize = 48;

#[derive(Debug, Clone)]
pub struct SessionService {
    client: Client,
    prefix: String,
    ttl_seconds: u64,
}

impl SessionService {
    /// Create a new SessionService instance
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::open(settings.redis.url.as_str()).map_err(AppError::Redis)?;

        Ok(Self {
            client,
            prefix: settings.redis.prefix.clone(),
            ttl_seconds: settings.auth.session_ttl_seconds,
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::Connection> {
        self.client
            .get_async_connection()
            .await
            .map_err(AppError::Redis)
    }

    fn key(&self, token: &str) -> String {
        format!("{}session:{}", self.prefix, token)
    }

    /// Mint a session for a logged-in user and return its token
    pub async fn create_session(&self, user_id: i64) -> Result<String> {
        let token = generate_token(TOKEN_LENGTH);
        let mut conn = self.get_connection().await?;

        let _: () = conn
            .set_ex(self.key(&token), user_id, self.ttl_seconds)
            .await
            .map_err(AppError::Redis)?;

        debug!(user_id = user_id, "Session created");
        Ok(token)
    }

    /// Resolve a session token to the user id it was minted for
    pub async fn resolve(&self, token: &str) -> Result<Option<i64>> {
        let mut conn = self.get_connection().await?;

        let user_id: Option<i64> = conn.get(self.key(token)).await.map_err(AppError::Redis)?;

        Ok(user_id)
    }

    /// Destroy a session (logout)
    pub async fn destroy(&self, token: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let deleted: i32 = conn.del(self.key(token)).await.map_err(AppError::Redis)?;

        debug!(deleted = deleted > 0, "Session destroyed");
        Ok(deleted > 0)
    }

    /// Health check for the Redis connection
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(AppError::Redis)?;

        Ok(response == "PONG")
    }
}

/// Generate a random alphanumeric session token
fn generate_token(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_charset() {
        let token = generate_token(TOKEN_LENGTH);
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token(TOKEN_LENGTH);
        let b = generate_token(TOKEN_LENGTH);
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_key_uses_prefix() {
        let settings = Settings::default();
        let service = SessionService::new(&settings).unwrap();
        assert_eq!(service.key("abc"), "gatherly:session:abc");
    }
}
