use std::path::Path;

use shared::catalog::BookFormat;

/// Metadata derived purely from a book's path. Parsing never fails; a
/// malformed name just produces a degenerate title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInfo {
    pub author: String,
    pub title: String,
    pub format: BookFormat,
}

const AUTHOR_TITLE_SEPARATOR: &str = " - ";

/// The library root's own directory name never stands in for an author.
const LIBRARY_DIR_NAME: &str = "Books";

pub fn parse_book_info(filepath: &str) -> BookInfo {
    let path = Path::new(filepath);
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let dir_name = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let format = if filepath.ends_with(".mobi") {
        BookFormat::Mobi
    } else {
        BookFormat::Epub
    };

    // "Author - Title.epub" layout. Only the second segment becomes the
    // title; further " - " segments are dropped.
    let mut parts = filename.split(AUTHOR_TITLE_SEPARATOR);
    let first = parts.next().unwrap_or("");
    if let Some(second) = parts.next() {
        return BookInfo {
            author: first.to_string(),
            title: strip_extension(second).to_string(),
            format,
        };
    }

    // No separator: clean the filename up (dots to spaces, collapsed
    // whitespace) and fall back to the parent directory as the author.
    let title = strip_extension(filename)
        .replace('.', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let author = if !dir_name.is_empty() && dir_name != LIBRARY_DIR_NAME && !dir_name.contains('/')
    {
        dir_name.to_string()
    } else {
        "Unknown".to_string()
    };

    BookInfo {
        author,
        title,
        format,
    }
}

/// Strip a trailing `.epub`/`.mobi`, case-insensitively. Other extensions
/// are left alone.
fn strip_extension(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for ext in [".epub", ".mobi"] {
        if lower.ends_with(ext) {
            return &name[..name.len() - ext.len()];
        }
    }
    name
}
