//! Event mutation handlers: edit, delete, registration changes
//!
//! GET requests return confirmation or form contexts; POST requests
//! mutate and redirect, matching the browser flow of the original
//! application.

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;
use tracing::debug;

use crate::middleware::CurrentUser;
use crate::models::{EventForm, ImageChange, ImageUpload};
use crate::state::AppState;
use crate::utils::errors::{AppError, Result};
use crate::utils::response;

fn detail_route(event_id: i64) -> String {
    format!("/events/{event_id}")
}

const LISTING_ROUTE: &str = "/events";

/// GET: the edit form pre-filled from the stored event
pub async fn edit_event_form(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Response> {
    let form = state.services.events.edit_form(event_id).await?;

    Ok(response::page(json!({
        "form": form,
        "given_event_id": event_id,
    })))
}

/// POST: apply the submitted edit form, then redirect to the detail page
pub async fn update_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<i64>,
    multipart: Multipart,
) -> Result<Response> {
    let (form, image) = read_event_form(multipart).await?;

    debug!(
        event_id = event_id,
        user_id = current_user.user.id,
        "Updating event"
    );

    state
        .services
        .events
        .update_event(event_id, current_user.user.id, &form, image)
        .await?;

    Ok(Redirect::to(&detail_route(event_id)).into_response())
}

/// GET: deletion confirmation with the same flag computation as detail
pub async fn delete_event_confirm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Response> {
    let (event, flags) = state
        .services
        .events
        .detail(event_id, Some(current_user.user.id))
        .await?;

    Ok(response::page(json!({
        "event": event,
        "disable_flag": flags.disable_flag,
    })))
}

/// POST: delete the event, then redirect to the listing with a notice
pub async fn delete_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Response> {
    state
        .services
        .events
        .delete_event(event_id, current_user.user.id)
        .await?;

    Ok(response::redirect_with_notice(
        LISTING_ROUTE,
        "Event deleted successfully.",
    ))
}

/// POST: register the requester for the event
pub async fn register(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Response> {
    state
        .services
        .events
        .register(event_id, current_user.user.id)
        .await?;

    Ok(Redirect::to(&detail_route(event_id)).into_response())
}

/// GET: cancellation confirmation; 404 when no registration exists
pub async fn cancel_registration_confirm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Response> {
    let user_id = current_user.user.id;
    let (event, flags) = state.services.events.detail(event_id, Some(user_id)).await?;

    if !flags.is_registered {
        return Err(AppError::RegistrationNotFound { event_id, user_id });
    }

    Ok(response::page(json!({
        "event": event,
        "disable_flag": flags.disable_flag,
    })))
}

/// POST: drop the requester's registration, then redirect with a notice
pub async fn cancel_registration(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<i64>,
) -> Result<Response> {
    state
        .services
        .events
        .cancel_registration(event_id, current_user.user.id)
        .await?;

    Ok(response::redirect_with_notice(
        LISTING_ROUTE,
        "Registration cancelled successfully.",
    ))
}

/// Pull the edit-form fields and the image decision out of a multipart
/// body. Unknown fields are ignored; the `image-clear` sentinel wins
/// over a simultaneous upload.
async fn read_event_form(mut multipart: Multipart) -> Result<(EventForm, ImageChange)> {
    let mut form = EventForm::default();
    let mut clear_requested = false;
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed form body: {e}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "event_name" => form.event_name = read_text(field).await?,
            "start_date" => form.start_date = read_text(field).await?,
            "end_date" => form.end_date = read_text(field).await?,
            "event_description" => form.event_description = read_text(field).await?,
            "location" => form.location = read_text(field).await?,
            "event_category" => form.event_category = read_text(field).await?,
            "image-clear" => clear_requested = true,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {e}")))?;
                // Browsers submit an empty part when no file was chosen
                if !bytes.is_empty() {
                    upload = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok((form, ImageChange::decide(clear_requested, upload)))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed form field: {e}")))
}
