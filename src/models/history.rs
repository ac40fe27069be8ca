//! Lending history model.
//!
//! Entries are immutable snapshots: the title is captured at the time of the
//! action so the log stays meaningful after a book is renamed or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::Book;

/// Action kinds recorded in the lending history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryAction {
    Borrow,
    Return,
}

impl HistoryAction {
    /// Return the wire code stored in the history file
    pub fn as_code(&self) -> &'static str {
        match self {
            HistoryAction::Borrow => "BORROW",
            HistoryAction::Return => "RETURN",
        }
    }

    /// Parse a wire code back into an action
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "BORROW" => Some(HistoryAction::Borrow),
            "RETURN" => Some(HistoryAction::Return),
            _ => None,
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// One borrow or return event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub action: HistoryAction,
    pub book_id: String,
    /// Title snapshot at the time of the action
    pub title: String,
    pub borrower: String,
}

impl HistoryEntry {
    /// Record an action against a book, stamped with the current time
    pub fn record(action: HistoryAction, book: &Book, borrower: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            book_id: book.id.clone(),
            title: book.title.clone(),
            borrower: borrower.into(),
        }
    }
}
