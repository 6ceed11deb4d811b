use axum::extract::State;
use axum::Json;
use shared::catalog::{
    BulkDeleteRequest, BulkDeleteResponse, CatalogEntry, DeleteRequest, StatusResponse,
};
use shelfpost::{remover, scanner};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/sync-library: recompute the whole catalog from the filesystem.
pub async fn sync_library(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    info!("Scanning library...");
    let root = state.library_root.clone();
    // The walk is synchronous; keep it off the request threads.
    let books = tokio::task::spawn_blocking(move || scanner::scan_library(&root)).await??;
    info!("Returning {} books", books.len());
    Ok(Json(books))
}

/// POST /api/delete-book: delete a single file (plus its mobi sibling).
pub async fn delete_book(
    Json(req): Json<DeleteRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    info!("Deleting: {}", req.filepath);
    remover::remove_book(&req.filepath).await?;
    Ok(Json(StatusResponse {
        status: "success".to_string(),
        message: "Book deleted successfully".to_string(),
    }))
}

/// POST /api/delete-books: bulk delete. Always answers 200; per-file
/// failures are conveyed only through the counts.
pub async fn delete_books(Json(req): Json<BulkDeleteRequest>) -> Json<BulkDeleteResponse> {
    let outcome = remover::remove_books(&req.filepaths).await;
    Json(BulkDeleteResponse {
        status: "success".to_string(),
        message: format!("Deleted {} books", outcome.deleted),
        deleted: outcome.deleted,
        failed: outcome.failed,
    })
}
