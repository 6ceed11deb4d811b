use serde::{Deserialize, Serialize};

/// A book selected for dispatch. Title and author come from the client so
/// the server does not re-parse filenames at send time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRef {
    pub filepath: String,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    pub books: Vec<BookRef>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestMailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestMailResponse {
    pub status: String,
    pub message: String,
    pub smtp_code: String,
    pub smtp_response: String,
    pub from: String,
}

/// Relay coordinates attached to test-mail failures, so a misconfigured
/// relay can be diagnosed from the response alone. Never carries the
/// password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpDetails {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub sender: String,
}
