use std::path::PathBuf;
use std::sync::Arc;

use shelfpost::mailer::MailTransport;
use shelfpost::SmtpSettings;

/// Shared application state handed to every handler through `State`.
///
/// Nothing here mutates after startup. The catalog itself is never cached;
/// each scan request recomputes it from the filesystem, so concurrent
/// requests only meet at the filesystem (last writer wins).
#[derive(Clone)]
pub struct AppState {
    pub library_root: PathBuf,
    pub smtp: SmtpSettings,
    /// `None` when no relay is configured; mail endpoints then fail with a
    /// clear error while everything else keeps working.
    pub transport: Option<Arc<dyn MailTransport>>,
}

impl AppState {
    pub fn transport(&self) -> shelfpost::Result<&Arc<dyn MailTransport>> {
        self.transport
            .as_ref()
            .ok_or(shelfpost::Error::NotConfigured)
    }
}
