//! Repository layer for flat-file persistence

pub mod books;
pub mod history;

use std::fs;

use crate::config::StorageConfig;
use crate::error::AppResult;

/// Main repository struct holding the file-backed stores
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub history: history::HistoryRepository,
}

impl Repository {
    /// Create a new repository rooted at the configured data directory
    pub fn new(storage: &StorageConfig) -> AppResult<Self> {
        fs::create_dir_all(&storage.data_dir)?;
        Ok(Self {
            books: books::BooksRepository::new(storage.books_path()),
            history: history::HistoryRepository::new(storage.history_path()),
        })
    }
}
