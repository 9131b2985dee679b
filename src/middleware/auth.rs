//! Request-scoped identity
//!
//! Handlers receive the requesting user as an explicit extractor
//! argument instead of reading ambient session state. `CurrentUser`
//! gates a handler: without a live session the request is redirected to
//! the login route. `MaybeUser` never redirects; it yields `None` for
//! anonymous viewers.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use axum::response::{IntoResponse, Redirect, Response};

use crate::models::User;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Route unauthenticated requests to gated handlers are sent to
pub const LOGIN_ROUTE: &str = "/login";

/// An authenticated requester with the session token that proved it
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// The requester when authentication is optional
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// Why identity extraction did not produce a user
#[derive(Debug)]
pub enum AuthRejection {
    /// No live session; the client belongs on the login page
    LoginRedirect,
    /// Session lookup itself failed
    Error(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRedirect => Redirect::to(LOGIN_ROUTE).into_response(),
            AuthRejection::Error(e) => e.into_response(),
        }
    }
}

/// Pull the session token out of the request's cookies
fn session_token(parts: &Parts, cookie_name: &str) -> Option<String> {
    let header = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.settings.auth.session_cookie;
        let token = session_token(parts, cookie_name).ok_or(AuthRejection::LoginRedirect)?;

        let user = state
            .services
            .auth
            .current_user(&token)
            .await
            .map_err(AuthRejection::Error)?
            .ok_or(AuthRejection::LoginRedirect)?;

        Ok(CurrentUser { user, token })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie_name = &state.settings.auth.session_cookie;
        let Some(token) = session_token(parts, cookie_name) else {
            return Ok(MaybeUser(None));
        };

        let user = state
            .services
            .auth
            .current_user(&token)
            .await
            .map_err(AuthRejection::Error)?;

        Ok(MaybeUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_cookie(value: &str) -> Parts {
        let request = Request::builder()
            .uri("/events")
            .header(header::COOKIE, value)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn test_session_token_found() {
        let parts = parts_with_cookie("theme=dark; session=abc123");
        assert_eq!(session_token(&parts, "session").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_token_missing() {
        let parts = parts_with_cookie("theme=dark");
        assert!(session_token(&parts, "session").is_none());
    }

    #[test]
    fn test_empty_session_value_ignored() {
        let parts = parts_with_cookie("session=");
        assert!(session_token(&parts, "session").is_none());
    }

    #[test]
    fn test_no_cookie_header() {
        let request = Request::builder().uri("/events").body(()).unwrap();
        let (parts, _) = request.into_parts();
        assert!(session_token(&parts, "session").is_none());
    }
}
