//! Authentication gate tests
//!
//! Every gated handler must answer an unauthenticated request with a
//! redirect to the login route, before touching any backing store. The
//! router is built over lazy connections, so these tests run without a
//! database or Redis.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use gatherly::config::Settings;
use gatherly::database::Database;
use gatherly::routes::create_routes;
use gatherly::services::ServiceFactory;
use gatherly::state::AppState;

fn build_app() -> Router {
    let settings = Settings::default();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&settings.database.url)
        .expect("lazy pool");
    let db = Database::new(pool);
    let services = ServiceFactory::new(&settings, db.clone()).expect("services");
    create_routes(AppState::new(settings, db, services))
}

async fn assert_redirects_to_login(method: &str, uri: &str) {
    let app = build_app();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "{method} {uri} should redirect"
    );
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok());
    assert_eq!(location, Some("/login"), "{method} {uri} redirect target");
}

#[tokio::test]
async fn test_main_listing_requires_login() {
    assert_redirects_to_login("GET", "/events").await;
}

#[tokio::test]
async fn test_my_events_requires_login() {
    assert_redirects_to_login("GET", "/my-events").await;
}

#[tokio::test]
async fn test_edit_requires_login() {
    assert_redirects_to_login("GET", "/events/1/edit").await;
    assert_redirects_to_login("POST", "/events/1/edit").await;
}

#[tokio::test]
async fn test_delete_requires_login() {
    assert_redirects_to_login("GET", "/events/1/delete").await;
    assert_redirects_to_login("POST", "/events/1/delete").await;
}

#[tokio::test]
async fn test_register_requires_login() {
    assert_redirects_to_login("POST", "/events/1/register").await;
}

#[tokio::test]
async fn test_cancel_registration_requires_login() {
    assert_redirects_to_login("GET", "/events/1/cancel-registration").await;
    assert_redirects_to_login("POST", "/events/1/cancel-registration").await;
}

#[tokio::test]
async fn test_logout_requires_login() {
    assert_redirects_to_login("POST", "/auth/logout").await;
}

#[tokio::test]
async fn test_login_page_is_open() {
    let app = build_app();
    let request = Request::builder()
        .uri("/login")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = build_app();
    let request = Request::builder()
        .uri("/does-not-exist")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
