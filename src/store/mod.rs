//! In-memory stores layered over the flat-file repositories

pub mod catalog;
pub mod history;

pub use catalog::Catalog;
pub use history::HistoryLog;
