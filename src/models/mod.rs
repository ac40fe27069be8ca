//! Data models for Alcove

pub mod book;
pub mod history;
pub mod requests;

// Re-export commonly used types
pub use book::{Book, SortKey};
pub use history::{HistoryAction, HistoryEntry};
pub use requests::{
    AddBookRequest, BorrowRequest, DeleteBookRequest, HistoryRequest, ListRequest, ReturnRequest,
    SearchQuery, UpdateBookRequest,
};
