//! Route table

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, events, health, manage};
use crate::middleware::LOGIN_ROUTE;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(LOGIN_ROUTE, get(auth::login_page))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/events", get(events::main_page))
        .route("/events/archive", get(events::past_events))
        .route("/events/:id", get(events::event_detail))
        .route(
            "/events/:id/edit",
            get(manage::edit_event_form).post(manage::update_event),
        )
        .route(
            "/events/:id/delete",
            get(manage::delete_event_confirm).post(manage::delete_event),
        )
        .route("/events/:id/register", post(manage::register))
        .route(
            "/events/:id/cancel-registration",
            get(manage::cancel_registration_confirm).post(manage::cancel_registration),
        )
        .route("/my-events", get(events::my_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
