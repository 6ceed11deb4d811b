use std::path::Path;

use chrono::Utc;
use shared::catalog::CatalogEntry;
use tracing::info;
use walkdir::WalkDir;

use crate::catalog::parse_book_info;
use crate::error::{Error, Result};

/// Status every freshly scanned entry carries.
const READY_STATUS: &str = "ready";

/// Walk `root` and build the catalog from every `.epub` file found.
///
/// The catalog is recomputed from scratch on every call. Ids are positions
/// in walk order and mean nothing across scans. Mobi files are not listed:
/// they are conversion siblings of an epub, not separate books.
///
/// An unreadable root or a failed walk step fails the whole scan; there are
/// no partial results. An empty directory is a valid, empty catalog.
pub fn scan_library(root: &Path) -> Result<Vec<CatalogEntry>> {
    let scanned_at = Utc::now();
    let mut entries: Vec<CatalogEntry> = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| Error::Scan {
            path: root.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !name.ends_with(".epub") {
            continue;
        }

        let filepath = entry.path().to_string_lossy().into_owned();
        let info = parse_book_info(&filepath);
        entries.push(CatalogEntry {
            id: entries.len(),
            filepath,
            filename: name.to_string(),
            author: info.author,
            title: info.title,
            format: info.format,
            status: READY_STATUS.to_string(),
            added: scanned_at,
        });
    }

    info!(
        "Found {} epub files under {}",
        entries.len(),
        root.display()
    );
    Ok(entries)
}
