use std::io;
use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use shared::mail::BookRef;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Fixed subject the downstream conversion service keys on. Changing this
/// breaks automatic epub conversion on delivery.
pub const CONVERT_SUBJECT: &str = "Convert";

const TEST_SUBJECT: &str = "Shelfpost - Test Email";

const TEST_TEXT_BODY: &str = "This is a test email from your Shelfpost server. \
If you receive this, email is working correctly!\n\n\
Note: when sending books to your device, make sure this sender address \
is in your approved email list.";

const TEST_HTML_BODY: &str = "<p>This is a test email from your Shelfpost server.</p>\
<p>If you receive this, email is working correctly!</p>\
<p><strong>Important:</strong> when sending books to your device, make sure \
this sender address is in your approved email list.</p>";

/// Relay coordinates plus credentials.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub sender: String,
}

/// What the relay said about an accepted message.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    pub code: String,
    pub message: String,
}

/// A fully assembled outgoing message, transport-agnostic.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    pub attachment: Option<EmailAttachment>,
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Seam between the dispatch loops and the actual relay, so the loops can
/// be exercised against a recording stub.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt>;
}

/// Lettre-backed STARTTLS relay.
#[derive(Debug)]
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    /// Build a relay connection from settings.
    ///
    /// Fails with [`Error::NotConfigured`] when no user is set: scanning
    /// and deleting must keep working on a box with no relay at all, so
    /// the caller gets to degrade instead of crashing at startup.
    pub fn connect(settings: &SmtpSettings) -> Result<Self> {
        if settings.user.is_empty() {
            return Err(Error::NotConfigured);
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt> {
        let message = build_message(&email)?;
        let response = self.transport.send(message).await?;
        Ok(SendReceipt {
            code: response.code().to_string(),
            message: response.message().collect::<Vec<_>>().join(" "),
        })
    }
}

fn build_message(email: &OutgoingEmail) -> Result<Message> {
    let builder = Message::builder()
        .from(email.from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject.as_str());

    let message = match (&email.attachment, &email.html) {
        (Some(attachment), _) => {
            // File contents pass through unchanged; the receiving side
            // decides what to do with them.
            let file_part = Attachment::new(attachment.filename.clone()).body(
                attachment.content.clone(),
                ContentType::parse("application/octet-stream").expect("static mime type"),
            );
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text.clone()),
                    )
                    .singlepart(file_part),
            )?
        }
        (None, Some(html)) => builder.multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            html.clone(),
        ))?,
        (None, None) => builder.body(email.text.clone())?,
    };

    Ok(message)
}

/// Outcome of a batch send. `skipped` counts books whose file had vanished
/// between scan and send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    pub sent: usize,
    pub skipped: usize,
}

/// Send each book to `email`, one message per book, strictly in order.
///
/// A missing file is skipped and the batch continues; the first relay
/// failure aborts the rest of the batch. Every accepted message is already
/// out the door, so there is no undo and no retry here.
pub async fn send_books(
    transport: &dyn MailTransport,
    sender: &str,
    books: &[BookRef],
    email: &str,
) -> Result<SendSummary> {
    info!("Sending {} books to {}", books.len(), email);

    let mut summary = SendSummary::default();
    for book in books {
        let content = match tokio::fs::read(&book.filepath).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("File not found: {}, skipping", book.filepath);
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let filename = Path::new(&book.filepath)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| book.filepath.clone());

        let receipt = transport
            .send(OutgoingEmail {
                from: sender.to_string(),
                to: email.to_string(),
                subject: CONVERT_SUBJECT.to_string(),
                text: format!("{} by {}", book.title, book.author),
                html: None,
                attachment: Some(EmailAttachment { filename, content }),
            })
            .await?;

        info!("Sent '{}' to {} ({})", book.title, email, receipt.code);
        summary.sent += 1;
    }

    Ok(summary)
}

/// Send the fixed diagnostic message, returning the relay's reply.
pub async fn send_test(
    transport: &dyn MailTransport,
    sender: &str,
    email: &str,
) -> Result<SendReceipt> {
    info!("Sending test email from {} to {}", sender, email);
    transport
        .send(OutgoingEmail {
            from: sender.to_string(),
            to: email.to_string(),
            subject: TEST_SUBJECT.to_string(),
            text: TEST_TEXT_BODY.to_string(),
            html: Some(TEST_HTML_BODY.to_string()),
            attachment: None,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    /// Records every message; optionally refuses from the nth send on.
    struct StubRelay {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail_from: Option<usize>,
    }

    impl StubRelay {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_from: None,
            }
        }

        fn failing_from(n: usize) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_from: Some(n),
            }
        }

        fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MailTransport for StubRelay {
        async fn send(&self, email: OutgoingEmail) -> Result<SendReceipt> {
            let mut sent = self.sent.lock().unwrap();
            if let Some(limit) = self.fail_from {
                if sent.len() >= limit {
                    return Err(Error::Io(io::Error::other("relay refused")));
                }
            }
            sent.push(email);
            Ok(SendReceipt {
                code: "250".to_string(),
                message: "2.0.0 OK".to_string(),
            })
        }
    }

    fn book_on_disk(dir: &Path, name: &str, title: &str, author: &str) -> BookRef {
        let path = dir.join(name);
        fs::write(&path, b"book bytes").unwrap();
        BookRef {
            filepath: path.to_string_lossy().into_owned(),
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    #[tokio::test]
    async fn sends_every_book_with_the_conversion_subject() {
        let dir = tempfile::tempdir().unwrap();
        let books = vec![
            book_on_disk(dir.path(), "a.epub", "Emma", "Jane Austen"),
            book_on_disk(dir.path(), "b.epub", "Dracula", "Bram Stoker"),
        ];
        let relay = StubRelay::new();

        let summary = send_books(&relay, "me@example.com", &books, "kindle@example.com")
            .await
            .unwrap();

        assert_eq!(summary, SendSummary { sent: 2, skipped: 0 });
        let sent = relay.sent();
        assert_eq!(sent.len(), 2);
        for email in &sent {
            assert_eq!(email.subject, CONVERT_SUBJECT);
            assert_eq!(email.to, "kindle@example.com");
            assert_eq!(email.from, "me@example.com");
        }
        assert_eq!(sent[0].text, "Emma by Jane Austen");
        assert_eq!(sent[0].attachment.as_ref().unwrap().filename, "a.epub");
        assert_eq!(sent[0].attachment.as_ref().unwrap().content, b"book bytes");
    }

    #[tokio::test]
    async fn missing_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut books = vec![book_on_disk(dir.path(), "a.epub", "Emma", "Jane Austen")];
        books.push(BookRef {
            filepath: dir.path().join("vanished.epub").to_string_lossy().into_owned(),
            title: "Gone".to_string(),
            author: "Nobody".to_string(),
        });
        books.push(book_on_disk(dir.path(), "c.epub", "Dracula", "Bram Stoker"));

        let relay = StubRelay::new();
        let summary = send_books(&relay, "me@example.com", &books, "kindle@example.com")
            .await
            .unwrap();

        assert_eq!(summary, SendSummary { sent: 2, skipped: 1 });
        let titles: Vec<String> = relay.sent().iter().map(|e| e.text.clone()).collect();
        assert_eq!(titles, vec!["Emma by Jane Austen", "Dracula by Bram Stoker"]);
    }

    #[tokio::test]
    async fn relay_failure_aborts_the_rest_of_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let books = vec![
            book_on_disk(dir.path(), "a.epub", "One", "A"),
            book_on_disk(dir.path(), "b.epub", "Two", "B"),
            book_on_disk(dir.path(), "c.epub", "Three", "C"),
        ];

        let relay = StubRelay::failing_from(1);
        let err = send_books(&relay, "me@example.com", &books, "kindle@example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        // Only the first message went out before the abort.
        assert_eq!(relay.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_send_carries_text_and_html() {
        let relay = StubRelay::new();
        let receipt = send_test(&relay, "me@example.com", "kindle@example.com")
            .await
            .unwrap();

        assert_eq!(receipt.code, "250");
        let sent = relay.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, TEST_SUBJECT);
        assert!(sent[0].html.is_some());
        assert!(sent[0].attachment.is_none());
    }

    #[test]
    fn relay_without_a_user_is_not_configured() {
        let err = SmtpRelay::connect(&SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            user: String::new(),
            pass: String::new(),
            sender: String::new(),
        })
        .unwrap_err();
        assert!(matches!(err, Error::NotConfigured));
    }

    #[test]
    fn builds_a_message_with_an_attachment() {
        let message = build_message(&OutgoingEmail {
            from: "me@example.com".to_string(),
            to: "kindle@example.com".to_string(),
            subject: CONVERT_SUBJECT.to_string(),
            text: "Emma by Jane Austen".to_string(),
            html: None,
            attachment: Some(EmailAttachment {
                filename: "a.epub".to_string(),
                content: b"book bytes".to_vec(),
            }),
        })
        .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Convert"));
        assert!(raw.contains("a.epub"));
    }

    #[test]
    fn rejects_an_invalid_destination_address() {
        let err = build_message(&OutgoingEmail {
            from: "me@example.com".to_string(),
            to: "not an address".to_string(),
            subject: "x".to_string(),
            text: "y".to_string(),
            html: None,
            attachment: None,
        })
        .unwrap_err();
        assert!(matches!(err, Error::Address(_)));
    }
}
