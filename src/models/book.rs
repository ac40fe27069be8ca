//! Book (catalog entry) model and related types.
//!
//! A book carries its lending state inline: `is_borrowed` plus the name of the
//! current borrower. The borrower field is an empty string while the book sits
//! on the shelf.

use serde::{Deserialize, Serialize};

/// Full book record (catalog + lending state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, `BK` followed by a zero-padded number (e.g. `BK001`)
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub is_borrowed: bool,
    /// Name of the current borrower, empty when available
    pub borrower: String,
}

impl Book {
    /// Human-readable availability label
    pub fn status_label(&self) -> &'static str {
        if self.is_borrowed {
            "Borrowed"
        } else {
            "Available"
        }
    }
}

/// Sort orders for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    /// Storage order, no rearrangement
    Unsorted,
    /// Case-insensitive title order
    Title,
    /// Ascending publication year
    Year,
    /// Available books first, then borrowed
    Availability,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Unsorted
    }
}

impl SortKey {
    /// Return the label shown in listings for this order
    pub fn as_label(&self) -> &'static str {
        match self {
            SortKey::Unsorted => "unsorted",
            SortKey::Title => "title",
            SortKey::Year => "year",
            SortKey::Availability => "availability",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}
