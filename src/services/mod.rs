//! Business logic services

pub mod auth;
pub mod library;

pub use auth::{AdminAuthenticator, ConfigCredentials};
pub use library::{LibraryService, LibraryStats};
