//! Catalog store: the in-memory book set and its lending state machine.
//!
//! The catalog is loaded once at startup and stays authoritative for the
//! session. Every mutation rewrites the books store through the repository
//! before the next operation runs; a failed write is logged and the session
//! continues on memory alone.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};
use crate::models::book::{Book, SortKey};
use crate::models::requests::SearchQuery;
use crate::repository::books::BooksRepository;

/// IDs are `BK` plus a numeric suffix; the suffix drives the counter
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^BK(\d+)$").unwrap());

/// The book set, keyed by ID and kept in insertion (storage) order
pub struct Catalog {
    books: IndexMap<String, Book>,
    next_id: u32,
    borrow_limit: usize,
    repo: BooksRepository,
}

impl Catalog {
    /// Load the catalog from the books store and derive the ID counter
    pub fn open(repo: BooksRepository, borrow_limit: usize) -> AppResult<Self> {
        let loaded = repo.load_all()?;
        let mut books = IndexMap::with_capacity(loaded.len());
        for book in loaded {
            books.insert(book.id.clone(), book);
        }
        let mut catalog = Self {
            books,
            next_id: 1,
            borrow_limit,
            repo,
        };
        catalog.recalc_next_id();
        tracing::info!("Loaded {} book(s) from the catalog store", catalog.len());
        Ok(catalog)
    }

    /// Re-derive the counter from the highest numeric suffix present.
    ///
    /// The counter itself is never persisted, so IDs freed by a delete can
    /// reappear after a restart. Known limitation, kept as-is.
    fn recalc_next_id(&mut self) {
        let max = self
            .books
            .keys()
            .filter_map(|id| ID_PATTERN.captures(id))
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        self.next_id = max + 1;
    }

    /// Hand out a fresh ID, zero-padded to three digits. Never reused within
    /// the session, deletions included.
    pub fn generate_next_id(&mut self) -> String {
        let id = format!("BK{:03}", self.next_id);
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Create a record with a fresh ID and persist the catalog
    pub fn add(&mut self, title: String, author: String, year: i32) -> Book {
        let book = Book {
            id: self.generate_next_id(),
            title,
            author,
            year,
            is_borrowed: false,
            borrower: String::new(),
        };
        self.books.insert(book.id.clone(), book.clone());
        self.flush();
        book
    }

    /// Apply the supplied fields to an existing record
    pub fn update(
        &mut self,
        id: &str,
        title: Option<String>,
        author: Option<String>,
        year: Option<i32>,
    ) -> AppResult<Book> {
        let book = self
            .books
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        if let Some(title) = title {
            book.title = title;
        }
        if let Some(author) = author {
            book.author = author;
        }
        if let Some(year) = year {
            book.year = year;
        }
        let updated = book.clone();
        self.flush();
        Ok(updated)
    }

    /// Remove a record in any lending state
    pub fn delete(&mut self, id: &str) -> AppResult<Book> {
        let removed = self
            .books
            .shift_remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        self.flush();
        Ok(removed)
    }

    /// Exact ID lookup
    pub fn find_by_id(&self, id: &str) -> Option<&Book> {
        self.books.get(id)
    }

    /// Matching records in storage order
    pub fn search(&self, query: &SearchQuery) -> Vec<Book> {
        self.books
            .values()
            .filter(|book| match query {
                SearchQuery::Title(fragment) => contains_ci(&book.title, fragment),
                SearchQuery::Author(fragment) => contains_ci(&book.author, fragment),
                SearchQuery::Year(year) => book.year == *year,
                SearchQuery::TitleOrAuthor(fragment) => {
                    contains_ci(&book.title, fragment) || contains_ci(&book.author, fragment)
                }
            })
            .cloned()
            .collect()
    }

    /// Fresh ordered view of the whole catalog; storage order is untouched
    pub fn list_all(&self, sort: SortKey) -> Vec<Book> {
        let mut books: Vec<Book> = self.books.values().cloned().collect();
        match sort {
            SortKey::Unsorted => {}
            SortKey::Title => books.sort_by_key(|book| book.title.to_lowercase()),
            SortKey::Year => books.sort_by_key(|book| book.year),
            // stable sort keeps storage order within each group
            SortKey::Availability => books.sort_by_key(|book| book.is_borrowed),
        }
        books
    }

    /// Number of records currently out on loan
    pub fn count_borrowed(&self) -> usize {
        self.books.values().filter(|book| book.is_borrowed).count()
    }

    /// Count currently-borrowed records held by `name`
    pub fn count_borrowed_by(&self, name: &str) -> usize {
        let needle = name.trim().to_lowercase();
        self.books
            .values()
            .filter(|book| book.is_borrowed && book.borrower.trim().to_lowercase() == needle)
            .count()
    }

    /// Resolve a borrow target from an exact ID or a title fragment.
    ///
    /// A single title hit resolves; several hits are reported back with the
    /// candidate list so the caller can re-supply an exact ID.
    pub fn resolve_target(&self, query: &str) -> AppResult<Book> {
        if let Some(book) = self.books.get(query) {
            return Ok(book.clone());
        }
        let mut candidates: Vec<Book> = self
            .books
            .values()
            .filter(|book| contains_ci(&book.title, query))
            .cloned()
            .collect();
        if candidates.len() > 1 {
            return Err(AppError::AmbiguousMatch {
                query: query.to_string(),
                candidates,
            });
        }
        candidates
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("No book matches '{}'", query)))
    }

    /// Borrow a record by exact ID, checking the lending guards in order
    pub fn borrow(&mut self, id: &str, borrower: &str) -> AppResult<Book> {
        let limit = self.borrow_limit;
        let current = self.count_borrowed_by(borrower);
        let name = borrower.trim();
        let book = self
            .books
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        if book.is_borrowed {
            return Err(AppError::AlreadyBorrowed {
                id: book.id.clone(),
                borrower: book.borrower.clone(),
            });
        }
        if name.is_empty() {
            return Err(AppError::EmptyName);
        }
        if current >= limit {
            return Err(AppError::LimitExceeded {
                borrower: name.to_string(),
                limit,
                current,
            });
        }
        book.is_borrowed = true;
        book.borrower = name.to_string();
        let updated = book.clone();
        self.flush();
        Ok(updated)
    }

    /// Return a borrowed record, verifying the borrower's name
    pub fn return_book(&mut self, id: &str, name: &str) -> AppResult<Book> {
        let book = self
            .books
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
        if !book.is_borrowed {
            return Err(AppError::NotBorrowed(book.id.clone()));
        }
        if book.borrower.trim().to_lowercase() != name.trim().to_lowercase() {
            return Err(AppError::NameMismatch {
                id: book.id.clone(),
                expected: book.borrower.clone(),
            });
        }
        book.is_borrowed = false;
        book.borrower.clear();
        let updated = book.clone();
        self.flush();
        Ok(updated)
    }

    /// Rewrite the books store; a failure leaves memory authoritative
    pub fn flush(&self) {
        let books: Vec<Book> = self.books.values().cloned().collect();
        if let Err(e) = self.repo.save_all(&books) {
            tracing::warn!("Failed to write books store: {}", e);
        }
    }
}

impl Drop for Catalog {
    fn drop(&mut self) {
        self.flush();
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn open_catalog(dir: &TempDir) -> Catalog {
        let repo = BooksRepository::new(dir.path().join("books.txt"));
        Catalog::open(repo, 2).unwrap()
    }

    fn seeded_catalog(dir: &TempDir) -> Catalog {
        let mut catalog = open_catalog(dir);
        catalog.add("Dune".to_string(), "Frank Herbert".to_string(), 1965);
        catalog.add("Emma".to_string(), "Jane Austen".to_string(), 1815);
        catalog.add(
            "Dune Messiah".to_string(),
            "Frank Herbert".to_string(),
            1969,
        );
        catalog
    }

    #[test]
    fn test_open_without_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = open_catalog(&dir);
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_add_assigns_monotonic_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = open_catalog(&dir);
        let first = catalog.add("Dune".to_string(), "Frank Herbert".to_string(), 1965);
        let second = catalog.add("Emma".to_string(), "Jane Austen".to_string(), 1815);
        assert_eq!(first.id, "BK001");
        assert_eq!(second.id, "BK002");
        assert!(!first.is_borrowed);
        assert!(first.borrower.is_empty());
    }

    #[test]
    fn test_counter_derived_from_max_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("books.txt"),
            "BK007|Dune|Frank Herbert|1965|0|\nBK002|Emma|Jane Austen|1815|0|\n",
        )
        .unwrap();
        let mut catalog = open_catalog(&dir);
        let book = catalog.add("Hamlet".to_string(), "Shakespeare".to_string(), 1603);
        assert_eq!(book.id, "BK008");
    }

    #[test]
    fn test_delete_does_not_reclaim_id_within_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = open_catalog(&dir);
        catalog.add("Dune".to_string(), "Frank Herbert".to_string(), 1965);
        let second = catalog.add("Emma".to_string(), "Jane Austen".to_string(), 1815);
        catalog.delete(&second.id).unwrap();
        let third = catalog.add("Hamlet".to_string(), "Shakespeare".to_string(), 1603);
        assert_eq!(third.id, "BK003");
    }

    #[test]
    fn test_update_keeps_unchanged_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        let updated = catalog
            .update("BK002", Some("Persuasion".to_string()), None, None)
            .unwrap();
        assert_eq!(updated.title, "Persuasion");
        assert_eq!(updated.author, "Jane Austen");
        assert_eq!(updated.year, 1815);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        let err = catalog.update("BK999", None, None, None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        let removed = catalog.delete("BK002").unwrap();
        assert_eq!(removed.title, "Emma");
        assert!(catalog.find_by_id("BK002").is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_search_title_is_case_insensitive_in_storage_order() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seeded_catalog(&dir);
        let hits = catalog.search(&SearchQuery::Title("dune".to_string()));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "BK001");
        assert_eq!(hits[1].id, "BK003");
    }

    #[test]
    fn test_search_author_and_year() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seeded_catalog(&dir);
        assert_eq!(
            catalog
                .search(&SearchQuery::Author("austen".to_string()))
                .len(),
            1
        );
        let by_year = catalog.search(&SearchQuery::Year(1969));
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year[0].id, "BK003");
    }

    #[test]
    fn test_search_title_or_author() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seeded_catalog(&dir);
        let hits = catalog.search(&SearchQuery::TitleOrAuthor("herbert".to_string()));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_list_all_sorts_titles_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = open_catalog(&dir);
        catalog.add("banana".to_string(), "B".to_string(), 2000);
        catalog.add("Apple".to_string(), "A".to_string(), 2001);
        let sorted = catalog.list_all(SortKey::Title);
        assert_eq!(sorted[0].title, "Apple");
        assert_eq!(sorted[1].title, "banana");
        // the stored order is untouched
        assert_eq!(catalog.list_all(SortKey::Unsorted)[0].title, "banana");
    }

    #[test]
    fn test_list_all_availability_puts_available_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        catalog.borrow("BK001", "Alice").unwrap();
        let sorted = catalog.list_all(SortKey::Availability);
        assert!(!sorted[0].is_borrowed);
        assert!(!sorted[1].is_borrowed);
        assert_eq!(sorted[2].id, "BK001");
    }

    #[test]
    fn test_count_borrowed_trims_and_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        catalog.borrow("BK001", "Alice").unwrap();
        catalog.borrow("BK002", "  alice  ").unwrap();
        assert_eq!(catalog.count_borrowed_by("ALICE"), 2);
        assert_eq!(catalog.count_borrowed_by("Bob"), 0);
    }

    #[test]
    fn test_resolve_prefers_exact_id() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seeded_catalog(&dir);
        assert_eq!(catalog.resolve_target("BK002").unwrap().title, "Emma");
    }

    #[test]
    fn test_resolve_single_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seeded_catalog(&dir);
        assert_eq!(catalog.resolve_target("emma").unwrap().id, "BK002");
    }

    #[test]
    fn test_resolve_ambiguous_fragment_reports_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seeded_catalog(&dir);
        let err = catalog.resolve_target("dune").unwrap_err();
        match err {
            AppError::AmbiguousMatch { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected AmbiguousMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = seeded_catalog(&dir);
        assert!(matches!(
            catalog.resolve_target("zzz"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_borrow_marks_record_and_trims_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        let book = catalog.borrow("BK001", "  Alice ").unwrap();
        assert!(book.is_borrowed);
        assert_eq!(book.borrower, "Alice");
    }

    #[test]
    fn test_borrow_twice_is_already_borrowed() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        catalog.borrow("BK001", "Alice").unwrap();
        let err = catalog.borrow("BK001", "Bob").unwrap_err();
        match err {
            AppError::AlreadyBorrowed { borrower, .. } => assert_eq!(borrower, "Alice"),
            other => panic!("expected AlreadyBorrowed, got {:?}", other),
        }
    }

    #[test]
    fn test_borrow_rejects_blank_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        assert!(matches!(
            catalog.borrow("BK001", "   "),
            Err(AppError::EmptyName)
        ));
    }

    #[test]
    fn test_borrowed_book_reports_already_borrowed_before_name_check() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        catalog.borrow("BK001", "Alice").unwrap();
        assert!(matches!(
            catalog.borrow("BK001", ""),
            Err(AppError::AlreadyBorrowed { .. })
        ));
    }

    #[test]
    fn test_borrow_limit_frees_up_after_return() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        catalog.borrow("BK001", "Alice").unwrap();
        catalog.borrow("BK002", "Alice").unwrap();
        let err = catalog.borrow("BK003", "Alice").unwrap_err();
        match err {
            AppError::LimitExceeded { limit, current, .. } => {
                assert_eq!(limit, 2);
                assert_eq!(current, 2);
            }
            other => panic!("expected LimitExceeded, got {:?}", other),
        }
        catalog.return_book("BK001", "Alice").unwrap();
        assert!(catalog.borrow("BK003", "Alice").is_ok());
    }

    #[test]
    fn test_return_name_mismatch_keeps_record_borrowed() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        catalog.borrow("BK001", "Alice").unwrap();
        let err = catalog.return_book("BK001", "Bob").unwrap_err();
        assert!(matches!(err, AppError::NameMismatch { .. }));
        assert!(catalog.find_by_id("BK001").unwrap().is_borrowed);
    }

    #[test]
    fn test_return_is_case_insensitive_and_clears_borrower() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        catalog.borrow("BK001", "Alice").unwrap();
        let book = catalog.return_book("BK001", "alice").unwrap();
        assert!(!book.is_borrowed);
        assert!(book.borrower.is_empty());
    }

    #[test]
    fn test_return_available_book_is_not_borrowed() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = seeded_catalog(&dir);
        assert!(matches!(
            catalog.return_book("BK001", "Alice"),
            Err(AppError::NotBorrowed(_))
        ));
    }

    #[test]
    fn test_unwritable_store_keeps_memory_authoritative() {
        let dir = tempfile::tempdir().unwrap();
        // the data directory is never created, so every flush fails
        let repo = BooksRepository::new(dir.path().join("missing").join("books.txt"));
        let mut catalog = Catalog::open(repo, 2).unwrap();
        let book = catalog.add("Dune".to_string(), "Frank Herbert".to_string(), 1965);
        let borrowed = catalog.borrow(&book.id, "Alice").unwrap();
        assert!(borrowed.is_borrowed);
        assert_eq!(catalog.find_by_id("BK001").unwrap().borrower, "Alice");
        assert!(catalog.return_book("BK001", "alice").is_ok());
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_mutations_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut catalog = seeded_catalog(&dir);
            catalog.borrow("BK001", "Alice").unwrap();
        }
        let reloaded = open_catalog(&dir);
        assert_eq!(reloaded.len(), 3);
        let book = reloaded.find_by_id("BK001").unwrap();
        assert!(book.is_borrowed);
        assert_eq!(book.borrower, "Alice");
    }
}
