use axum::extract::State;
use axum::Json;
use serde_json::json;
use shared::catalog::StatusResponse;
use shared::mail::{SendRequest, SmtpDetails, TestMailRequest, TestMailResponse};
use shelfpost::mailer;
use tracing::{error, info};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/send-books: dispatch each book as a mail attachment, in
/// order. Missing files are skipped; the first relay failure fails the
/// whole request.
pub async fn send_books(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let transport = state.transport()?;
    let summary =
        mailer::send_books(transport.as_ref(), &state.smtp.sender, &req.books, &req.email).await?;

    Ok(Json(StatusResponse {
        status: "success".to_string(),
        message: format!("Sent {} books to {}", summary.sent, req.email),
    }))
}

/// POST /api/test-email: one diagnostic message. Failures answer with the
/// relay coordinates so a bad config can be read off the response.
pub async fn test_email(
    State(state): State<AppState>,
    Json(req): Json<TestMailRequest>,
) -> Result<Json<TestMailResponse>, ApiError> {
    info!("Testing email to: {}", req.email);

    let result = match state.transport() {
        Ok(transport) => mailer::send_test(transport.as_ref(), &state.smtp.sender, &req.email).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(receipt) => Ok(Json(TestMailResponse {
            status: "success".to_string(),
            message: format!("Test email sent to {}", req.email),
            smtp_code: receipt.code,
            smtp_response: receipt.message,
            from: state.smtp.sender.clone(),
        })),
        Err(e) => {
            error!("Test email failed: {e}");
            let details = SmtpDetails {
                host: state.smtp.host.clone(),
                port: state.smtp.port,
                user: state.smtp.user.clone(),
                sender: state.smtp.sender.clone(),
            };
            Err(ApiError::with_details(e.to_string(), json!(details)))
        }
    }
}
