pub mod catalog;
pub mod error;
pub mod mailer;
pub mod remover;
pub mod scanner;

pub use catalog::{parse_book_info, BookInfo};
pub use error::{Error, Result};
pub use mailer::{MailTransport, SmtpRelay, SmtpSettings};
pub use remover::{remove_book, remove_books, BulkRemoval, PrivilegedRemover, Removal, SudoRm};
pub use scanner::scan_library;
