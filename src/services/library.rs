//! Library facade: orchestrates the catalog and the history log.
//!
//! This is the single entry point a front end talks to. It validates request
//! shapes, forwards them to the stores, records history for successful
//! lending actions, and formats listings for display. It holds no lending
//! state of its own.

use validator::Validate;

use crate::{
    codec::TIMESTAMP_FORMAT,
    config::AppConfig,
    error::{AppError, AppResult},
    models::{
        book::Book,
        history::{HistoryAction, HistoryEntry},
        requests::{
            AddBookRequest, BorrowRequest, DeleteBookRequest, HistoryRequest, ListRequest,
            ReturnRequest, SearchQuery, UpdateBookRequest,
        },
    },
    repository::Repository,
    services::auth::{AdminAuthenticator, ConfigCredentials},
    store::{Catalog, HistoryLog},
};

/// Aggregate counts shown on the status screen
#[derive(Debug, Clone)]
pub struct LibraryStats {
    pub total_books: usize,
    pub borrowed: usize,
    pub available: usize,
    pub history_entries: usize,
}

pub struct LibraryService {
    catalog: Catalog,
    history: HistoryLog,
    auth: Box<dyn AdminAuthenticator>,
}

impl LibraryService {
    /// Open the stores behind the facade using the given configuration
    pub fn open(config: &AppConfig) -> AppResult<Self> {
        let repository = Repository::new(&config.storage)?;
        let catalog = Catalog::open(repository.books.clone(), config.lending.borrow_limit)?;
        let history = HistoryLog::open(repository.history.clone())?;
        Ok(Self {
            catalog,
            history,
            auth: Box::new(ConfigCredentials::new(&config.auth)),
        })
    }

    /// Swap in another credential backend
    pub fn with_authenticator(mut self, auth: Box<dyn AdminAuthenticator>) -> Self {
        self.auth = auth;
        self
    }

    /// Check admin credentials before a protected operation
    pub fn authenticate_admin(&self, username: &str, password: &str) -> AppResult<()> {
        if self.auth.verify(username, password) {
            Ok(())
        } else {
            Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ))
        }
    }

    /// Create a book record
    pub fn add_book(&mut self, request: AddBookRequest) -> AppResult<Book> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        Ok(self
            .catalog
            .add(request.title, request.author, request.year))
    }

    /// Update a book; empty or zero fields keep the current values
    pub fn update_book(&mut self, request: UpdateBookRequest) -> AppResult<Book> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let title = request.title.filter(|t| !t.trim().is_empty());
        let author = request.author.filter(|a| !a.trim().is_empty());
        let year = request.year.filter(|y| *y != 0);
        self.catalog.update(&request.id, title, author, year)
    }

    /// Delete a book once the caller has confirmed; `None` means declined
    pub fn delete_book(&mut self, request: DeleteBookRequest) -> AppResult<Option<Book>> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if !request.confirmed {
            return Ok(None);
        }
        self.catalog.delete(&request.id).map(Some)
    }

    /// Exact ID lookup
    pub fn get_book(&self, id: &str) -> AppResult<Book> {
        self.catalog
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Matching records in storage order
    pub fn search_books(&self, query: &SearchQuery) -> Vec<Book> {
        self.catalog.search(query)
    }

    /// The whole catalog in the requested order
    pub fn list_books(&self, request: ListRequest) -> Vec<Book> {
        self.catalog.list_all(request.sort)
    }

    /// Borrow a book located by ID or title fragment. Exactly one `BORROW`
    /// entry is recorded on success.
    pub fn borrow_book(&mut self, request: BorrowRequest) -> AppResult<Book> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let target = self.catalog.resolve_target(request.query.trim())?;
        let book = self.catalog.borrow(&target.id, &request.borrower)?;
        tracing::debug!("Borrow recorded: {} by {}", book.id, book.borrower);
        self.history.append(HistoryEntry::record(
            HistoryAction::Borrow,
            &book,
            book.borrower.clone(),
        ));
        Ok(book)
    }

    /// Return a borrowed book. Exactly one `RETURN` entry is recorded on
    /// success.
    pub fn return_book(&mut self, request: ReturnRequest) -> AppResult<Book> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let book = self.catalog.return_book(&request.id, &request.borrower)?;
        tracing::debug!("Return recorded: {} by {}", book.id, request.borrower.trim());
        self.history.append(HistoryEntry::record(
            HistoryAction::Return,
            &book,
            request.borrower.trim(),
        ));
        Ok(book)
    }

    /// Most recent history entries, oldest first
    pub fn recent_history(&self, request: HistoryRequest) -> &[HistoryEntry] {
        self.history.recent(request.count)
    }

    /// Aggregate counts for the status display
    pub fn stats(&self) -> LibraryStats {
        let total_books = self.catalog.len();
        let borrowed = self.catalog.count_borrowed();
        LibraryStats {
            total_books,
            borrowed,
            available: total_books - borrowed,
            history_entries: self.history.len(),
        }
    }

    /// Fixed-width catalog table used by the interactive menu
    pub fn render_book_table(books: &[Book]) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<7} {:<30} {:<20} {:<6} {}\n",
            "ID", "Title", "Author", "Year", "Status"
        ));
        out.push_str(&format!("{}\n", "-".repeat(75)));
        for book in books {
            out.push_str(&format!(
                "{:<7} {:<30} {:<20} {:<6} {}\n",
                book.id,
                truncate_title(&book.title),
                book.author,
                book.year,
                render_status(book),
            ));
        }
        out
    }

    /// Full details of a single record
    pub fn render_book_details(book: &Book) -> String {
        format!(
            "ID:     {}\nTitle:  {}\nAuthor: {}\nYear:   {}\nStatus: {}\n",
            book.id,
            book.title,
            book.author,
            book.year,
            render_status(book),
        )
    }

    /// One line per history event, oldest first
    pub fn render_history(entries: &[HistoryEntry]) -> String {
        let mut out = String::new();
        for entry in entries {
            out.push_str(&format!(
                "[{}] {} {} '{}' by {}\n",
                entry.timestamp.format(TIMESTAMP_FORMAT),
                entry.action,
                entry.book_id,
                entry.title,
                entry.borrower,
            ));
        }
        out
    }
}

fn render_status(book: &Book) -> String {
    if book.is_borrowed {
        format!("{} by {}", book.status_label(), book.borrower)
    } else {
        book.status_label().to_string()
    }
}

/// Titles longer than the table column are cut to 27 characters plus `...`
fn truncate_title(title: &str) -> String {
    if title.chars().count() > 27 {
        let cut: String = title.chars().take(27).collect();
        format!("{}...", cut)
    } else {
        title.to_string()
    }
}
