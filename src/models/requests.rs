//! Request types consumed by the session facade.
//!
//! These are the shapes a front end (the interactive menu, a future API) hands
//! to [`crate::services::library::LibraryService`]. Structural checks live here
//! as `validator` rules; lending-state rules stay in the catalog itself.

use serde::Deserialize;
use validator::Validate;

use super::book::SortKey;

/// Create a new book
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddBookRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub year: i32,
}

/// Update an existing book. `None` (or an empty string / zero year from the
/// menu) keeps the current value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, message = "Book ID must not be empty"))]
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
}

/// Delete a book. Deletion only proceeds once `confirmed` is set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteBookRequest {
    #[validate(length(min = 1, message = "Book ID must not be empty"))]
    pub id: String,
    pub confirmed: bool,
}

/// Borrow a book located by ID or title fragment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BorrowRequest {
    /// Exact book ID, or a case-insensitive title fragment
    #[validate(length(min = 1, message = "Search text must not be empty"))]
    pub query: String,
    pub borrower: String,
}

/// Return a borrowed book
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReturnRequest {
    #[validate(length(min = 1, message = "Book ID must not be empty"))]
    pub id: String,
    pub borrower: String,
}

/// Catalog search criteria
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum SearchQuery {
    /// Case-insensitive substring match on the title
    Title(String),
    /// Case-insensitive substring match on the author
    Author(String),
    /// Exact publication year
    Year(i32),
    /// Case-insensitive substring match on title or author
    TitleOrAuthor(String),
}

/// Catalog listing parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListRequest {
    pub sort: SortKey,
}

/// History listing parameters. A `count` of zero requests the full log.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct HistoryRequest {
    pub count: usize,
}
