use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub mod library;
pub mod mail;
pub mod system;

/// Build the full API router. CORS is wide open: the UI driving this API
/// is served from a different origin on the LAN.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sync-library", post(library::sync_library))
        .route("/api/delete-book", post(library::delete_book))
        .route("/api/delete-books", post(library::delete_books))
        .route("/api/send-books", post(mail::send_books))
        .route("/api/test-email", post(mail::test_email))
        .route("/api/health", get(system::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
