//! Alcove Book Lending Record Store
//!
//! An in-memory book catalog and an append-only lending history, both backed
//! by flat-file persistence, with borrow/return rules enforced per borrower.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::library::{LibraryService, LibraryStats};
