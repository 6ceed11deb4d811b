use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// How a delete ultimately succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Plain unlink worked, or the file was already gone.
    Clean,
    /// Plain unlink failed and the privileged retry succeeded.
    Escalated,
}

/// Aggregate result of a bulk delete. Per-item failures never abort the
/// batch; they only show up in `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkRemoval {
    pub deleted: usize,
    pub failed: usize,
}

/// Seam over the privileged fallback, so the escalation path can be
/// exercised without a passwordless sudo on the box running the tests.
#[async_trait]
pub trait PrivilegedRemover: Send + Sync {
    async fn remove(&self, filepath: &str) -> io::Result<()>;
}

/// `sudo -n rm -f -- <path>`: argv spawn, no shell in between, and `-n` so
/// a credential prompt can never hang the request.
pub struct SudoRm;

#[async_trait]
impl PrivilegedRemover for SudoRm {
    async fn remove(&self, filepath: &str) -> io::Result<()> {
        let output = Command::new("sudo")
            .args(["-n", "rm", "-f", "--", filepath])
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(io::Error::other(format!(
                "privileged delete exited with {}: {}",
                output.status,
                stderr.trim()
            )))
        }
    }
}

/// Delete one book file, retrying once with elevated privileges if the
/// plain unlink fails. Deleting a path that does not exist is a success.
///
/// For `.epub` paths the `.mobi` conversion sibling is removed as well,
/// best-effort: a leftover sibling is logged, never reported.
pub async fn remove_book(filepath: &str) -> Result<Removal> {
    remove_book_with(&SudoRm, filepath).await
}

/// [`remove_book`] with an explicit escalation backend.
pub async fn remove_book_with(
    escalation: &dyn PrivilegedRemover,
    filepath: &str,
) -> Result<Removal> {
    let removal = remove_with_escalation(escalation, filepath).await?;

    if let Some(sibling) = mobi_sibling(filepath) {
        match tokio::fs::remove_file(&sibling).await {
            Ok(()) => info!("Also deleted sibling {sibling}"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => debug!("Leaving sibling {sibling} behind: {e}"),
        }
    }

    Ok(removal)
}

/// Apply [`remove_book`] to every path, independently. The batch always
/// runs to the end; the caller learns about failures through the counts.
pub async fn remove_books(filepaths: &[String]) -> BulkRemoval {
    info!("Bulk deleting {} files", filepaths.len());

    let mut outcome = BulkRemoval::default();
    for filepath in filepaths {
        match remove_book(filepath).await {
            Ok(_) => outcome.deleted += 1,
            Err(e) => {
                warn!("Failed to delete {filepath}: {e}");
                outcome.failed += 1;
            }
        }
    }

    info!("Deleted {} files, {} failed", outcome.deleted, outcome.failed);
    outcome
}

async fn remove_with_escalation(
    escalation: &dyn PrivilegedRemover,
    filepath: &str,
) -> Result<Removal> {
    match tokio::fs::remove_file(filepath).await {
        Ok(()) => return Ok(Removal::Clean),
        // Deleting what is already gone counts as deleted.
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Removal::Clean),
        Err(e) => warn!("Plain delete of {filepath} failed ({e}), retrying with privileges"),
    }

    match escalation.remove(filepath).await {
        Ok(()) => {
            info!("Deleted {filepath} with elevated privileges");
            Ok(Removal::Escalated)
        }
        Err(source) => Err(Error::Delete {
            path: PathBuf::from(filepath),
            source,
        }),
    }
}

fn mobi_sibling(filepath: &str) -> Option<String> {
    filepath
        .strip_suffix(".epub")
        .map(|stem| format!("{stem}.mobi"))
}
