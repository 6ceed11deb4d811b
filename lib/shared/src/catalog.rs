use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// E-book format, decided by file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    Epub,
    Mobi,
}

/// One book in the catalog produced by a scan.
///
/// `id` is the entry's position in the current scan and nothing more; a
/// rescan reassigns ids from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: usize,
    pub filepath: String,
    pub filename: String,
    pub author: String,
    pub title: String,
    pub format: BookFormat,
    pub status: String,
    pub added: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub filepath: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub filepaths: Vec<String>,
}

/// Outcome of a bulk delete. The request itself always succeeds; per-file
/// failures only show up in the counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub status: String,
    pub message: String,
    pub deleted: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}
