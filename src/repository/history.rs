//! History repository for append-only file operations

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::codec;
use crate::error::AppResult;
use crate::models::history::HistoryEntry;

/// Append-only line store for lending events. Existing lines are never
/// rewritten.
#[derive(Clone)]
pub struct HistoryRepository {
    path: PathBuf,
}

impl HistoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the full event log in file order.
    ///
    /// A missing file is an empty log; undecodable lines are skipped with a
    /// warning.
    pub fn load_all(&self) -> AppResult<Vec<HistoryEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode_history(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    "Skipping malformed history record at {}:{}: {}",
                    self.path.display(),
                    index + 1,
                    e
                ),
            }
        }
        Ok(entries)
    }

    /// Append a single event to the end of the log
    pub fn append(&self, entry: &HistoryEntry) -> AppResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", codec::encode_history(entry))?;
        Ok(())
    }
}
