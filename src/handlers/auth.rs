//! Account handlers: signup, login, logout

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::middleware::CurrentUser;
use crate::models::{LoginRequest, SignupRequest};
use crate::state::AppState;
use crate::utils::errors::Result;
use crate::utils::response;

/// The named login route unauthenticated requests land on
pub async fn login_page() -> Response {
    response::page(json!({ "page": "login" }))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Response> {
    let user = state
        .services
        .auth
        .signup(&request.username, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": { "user": user },
            "message": "Account created successfully.",
        })),
    )
        .into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    let (user, token) = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;

    let cookie = session_cookie(&state, &token, state.settings.auth.session_ttl_seconds);
    let body = response::page_with_notice(json!({ "user": user }), "Logged in successfully.");

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), body).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Response> {
    state.services.auth.logout(&current_user.token).await?;

    // Max-Age=0 expires the cookie client-side
    let cookie = session_cookie(&state, "", 0);
    let body = response::page_with_notice(json!({}), "Logged out.");

    Ok((AppendHeaders([(SET_COOKIE, cookie)]), body).into_response())
}

fn session_cookie(state: &AppState, token: &str, max_age: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.settings.auth.session_cookie, token, max_age
    )
}
