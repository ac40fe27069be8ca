//! Configuration management for the Alcove lending store

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding the flat-file stores
    pub data_dir: String,
    pub books_file: String,
    pub history_file: String,
}

impl StorageConfig {
    /// Path of the books store file
    pub fn books_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.books_file)
    }

    /// Path of the history store file
    pub fn history_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.history_file)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LendingConfig {
    /// Maximum number of books one borrower may hold at once
    pub borrow_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub lending: LendingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix ALCOVE_)
            .add_source(
                Environment::with_prefix("ALCOVE")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override data directory from ALCOVE_DATA_DIR env var if present
            .set_override_option(
                "storage.data_dir",
                env::var("ALCOVE_DATA_DIR").ok(),
            )?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            books_file: "books.txt".to_string(),
            history_file: "history.txt".to_string(),
        }
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self { borrow_limit: 2 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "1234".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
