//! Event listing and detail handlers

use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::middleware::{CurrentUser, MaybeUser};
use crate::services::EventDisplay;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response;

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub category: Option<i64>,
    /// Kept as a raw string so clamping can handle non-integer values
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DisplayParams {
    pub display: Option<String>,
}

/// Main listing: search, category filter, clamped pagination
pub async fn main_page(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ListingParams>,
) -> Result<Response, AppError> {
    debug!(
        user_id = current_user.user.id,
        query = params.q.as_deref(),
        category = params.category,
        "Listing events"
    );

    let listing = state
        .services
        .events
        .list_events(
            params.q.as_deref(),
            params.category,
            params.page.as_deref(),
        )
        .await?;

    Ok(response::page(listing))
}

/// Events whose end date is already behind us, most recent first
pub async fn past_events(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Response, AppError> {
    let events = state
        .services
        .events
        .past_events(params.page.as_deref())
        .await?;

    Ok(response::page(json!({ "events": events })))
}

/// One event with the viewer's edit/registration flags
pub async fn event_detail(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(event_id): Path<i64>,
) -> Result<Response, AppError> {
    let viewer_id = viewer.as_ref().map(|user| user.id);
    let (event, flags) = state.services.events.detail(event_id, viewer_id).await?;

    Ok(response::page(json!({
        "event": event,
        "disable_flag": flags.disable_flag,
        "register_flag": flags.register_flag,
        "is_registered": flags.is_registered,
    })))
}

/// The requester's events: created by them, or registered for, never both
pub async fn my_events(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<DisplayParams>,
) -> Result<Response, AppError> {
    let display = EventDisplay::parse(params.display.as_deref());
    let events = state
        .services
        .events
        .my_events(current_user.user.id, display)
        .await?;

    Ok(response::page(json!({
        "display": display,
        "events": events,
    })))
}
