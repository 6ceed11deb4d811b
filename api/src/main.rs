use std::path::PathBuf;
use std::sync::Arc;

use api::config::{AppConfig, LIBRARY_ROOT};
use api::{router, AppState};
use shelfpost::mailer::MailTransport;
use shelfpost::{Error, SmtpRelay};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let smtp = config.smtp_settings();

    let transport: Option<Arc<dyn MailTransport>> = match SmtpRelay::connect(&smtp) {
        Ok(relay) => Some(Arc::new(relay)),
        Err(Error::NotConfigured) => {
            warn!("SMTP_USER is not set; mail endpoints are disabled");
            None
        }
        Err(e) => {
            warn!("Could not set up mail relay ({e}); mail endpoints are disabled");
            None
        }
    };

    let state = AppState {
        library_root: PathBuf::from(LIBRARY_ROOT),
        smtp,
        transport,
    };

    let addr = format!("{}:{}", config.ip, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Shelfpost API server running on {addr}");
    info!("Endpoints:");
    info!("  POST /api/sync-library");
    info!("  POST /api/delete-book");
    info!("  POST /api/delete-books (bulk)");
    info!("  POST /api/send-books");
    info!("  POST /api/test-email");
    info!("  GET  /api/health");

    axum::serve(listener, router(state)).await
}
