//! History log: the in-memory event sequence over the append-only store

use crate::error::AppResult;
use crate::models::history::HistoryEntry;
use crate::repository::history::HistoryRepository;

/// Insertion-ordered log of lending events. Entries are immutable once
/// appended.
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    repo: HistoryRepository,
}

impl HistoryLog {
    /// Load the full event log from the history store
    pub fn open(repo: HistoryRepository) -> AppResult<Self> {
        let entries = repo.load_all()?;
        tracing::info!("Loaded {} history entries", entries.len());
        Ok(Self { entries, repo })
    }

    /// Append an event, persisting it immediately.
    ///
    /// The in-memory log keeps the entry even when the store write fails.
    pub fn append(&mut self, entry: HistoryEntry) {
        if let Err(e) = self.repo.append(&entry) {
            tracing::warn!("Failed to append to history store: {}", e);
        }
        self.entries.push(entry);
    }

    /// Last `count` entries in insertion order. A count of zero, or one
    /// beyond the log size, returns the full log.
    pub fn recent(&self, count: usize) -> &[HistoryEntry] {
        if count == 0 || count >= self.entries.len() {
            &self.entries
        } else {
            &self.entries[self.entries.len() - count..]
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
