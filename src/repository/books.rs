//! Books repository for flat-file operations

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use crate::codec;
use crate::error::AppResult;
use crate::models::book::Book;

/// Line-per-record store for the book catalog. Writes replace the whole file.
#[derive(Clone)]
pub struct BooksRepository {
    path: PathBuf,
}

impl BooksRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load every readable book record.
    ///
    /// A missing file is an empty catalog. Blank lines are skipped silently;
    /// lines the codec rejects are skipped with a warning so one bad record
    /// never blocks startup.
    pub fn load_all(&self) -> AppResult<Vec<Book>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut books = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode_book(line) {
                Ok(book) => books.push(book),
                Err(e) => tracing::warn!(
                    "Skipping malformed book record at {}:{}: {}",
                    self.path.display(),
                    index + 1,
                    e
                ),
            }
        }
        Ok(books)
    }

    /// Rewrite the store with the given records, one line each
    pub fn save_all(&self, books: &[Book]) -> AppResult<()> {
        let file = fs::File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        for book in books {
            writeln!(writer, "{}", codec::encode_book(book))?;
        }
        writer.flush()?;
        Ok(())
    }
}
