//! Error types for the Alcove lending store

use thiserror::Error;

use crate::codec::CodecError;
use crate::models::book::Book;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Book {id} is already borrowed by {borrower}")]
    AlreadyBorrowed { id: String, borrower: String },

    #[error("Book {0} is not borrowed")]
    NotBorrowed(String),

    #[error("Name does not match the borrower of {id} ({expected})")]
    NameMismatch { id: String, expected: String },

    #[error("Borrowing limit reached: {borrower} already has {current} of {limit} allowed book(s)")]
    LimitExceeded {
        borrower: String,
        limit: usize,
        current: usize,
    },

    #[error("Borrower name cannot be empty")]
    EmptyName,

    #[error("{} books match '{query}'; enter an exact ID", .candidates.len())]
    AmbiguousMatch { query: String, candidates: Vec<Book> },

    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] CodecError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
