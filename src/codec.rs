//! Line codec for the flat-file record stores.
//!
//! Every record is a single line of `|`-separated fields. Free-text fields
//! (title, author, borrower) have embedded `|` replaced with `/` on encode so
//! a record can never spill across field boundaries. The substitution is
//! one-way: decode leaves `/` as-is.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::book::Book;
use crate::models::history::{HistoryAction, HistoryEntry};

/// Field separator in the stored line format
pub const FIELD_DELIMITER: char = '|';
/// Replacement for the separator inside free-text fields
pub const DELIMITER_SUBSTITUTE: &str = "/";
/// Timestamp layout used in history lines (UTC wall-clock)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOK_FIELDS: usize = 6;
const HISTORY_FIELDS: usize = 5;

/// Reasons a stored line cannot be decoded
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid year '{0}'")]
    InvalidYear(String),
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
}

/// Replace the field delimiter inside a free-text value
pub fn sanitize_field(value: &str) -> String {
    value.replace(FIELD_DELIMITER, DELIMITER_SUBSTITUTE)
}

/// Encode a book as `id|title|author|year|borrowed|borrower`
pub fn encode_book(book: &Book) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        book.id,
        sanitize_field(&book.title),
        sanitize_field(&book.author),
        book.year,
        if book.is_borrowed { "1" } else { "0" },
        sanitize_field(&book.borrower),
    )
}

/// Decode a book line. Fields beyond the sixth are ignored.
pub fn decode_book(line: &str) -> Result<Book, CodecError> {
    let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if parts.len() < BOOK_FIELDS {
        return Err(CodecError::FieldCount {
            expected: BOOK_FIELDS,
            found: parts.len(),
        });
    }
    let year = parts[3]
        .trim()
        .parse::<i32>()
        .map_err(|_| CodecError::InvalidYear(parts[3].to_string()))?;
    Ok(Book {
        id: parts[0].to_string(),
        title: parts[1].to_string(),
        author: parts[2].to_string(),
        year,
        is_borrowed: parts[4] == "1",
        borrower: parts[5].to_string(),
    })
}

/// Encode a history entry as `timestamp|action|book_id|title|borrower`
pub fn encode_history(entry: &HistoryEntry) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        entry.timestamp.format(TIMESTAMP_FORMAT),
        entry.action.as_code(),
        entry.book_id,
        sanitize_field(&entry.title),
        sanitize_field(&entry.borrower),
    )
}

/// Decode a history line. Fields beyond the fifth are ignored.
pub fn decode_history(line: &str) -> Result<HistoryEntry, CodecError> {
    let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if parts.len() < HISTORY_FIELDS {
        return Err(CodecError::FieldCount {
            expected: HISTORY_FIELDS,
            found: parts.len(),
        });
    }
    let timestamp = NaiveDateTime::parse_from_str(parts[0], TIMESTAMP_FORMAT)
        .map_err(|_| CodecError::InvalidTimestamp(parts[0].to_string()))?
        .and_utc();
    let action = HistoryAction::from_code(parts[1])
        .ok_or_else(|| CodecError::UnknownAction(parts[1].to_string()))?;
    Ok(HistoryEntry {
        timestamp,
        action,
        book_id: parts[2].to_string(),
        title: parts[3].to_string(),
        borrower: parts[4].to_string(),
    })
}
