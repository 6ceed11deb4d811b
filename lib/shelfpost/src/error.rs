use std::io;
use std::path::PathBuf;

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("cannot read library root {path}: {source}")]
    Scan { path: PathBuf, source: io::Error },

    #[error("cannot delete {path}: {source}")]
    Delete { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("mail relay error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not assemble message: {0}")]
    Email(#[from] lettre::error::Error),

    #[error("mail relay is not configured")]
    NotConfigured,
}
