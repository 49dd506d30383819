//! Startup configuration. There are no command-line flags; a handful of
//! environment variables can move the catalog file or turn on diagnostics.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Catalog file name, resolved against the working directory by default.
pub const DEFAULT_CATALOG_FILE: &str = "library_data.json";
/// Overrides the catalog file location.
pub const CATALOG_FILE_VAR: &str = "BOOK_CATALOG_FILE";
/// `env_logger` filter string; logging stays off when unset.
pub const LOG_FILTER_VAR: &str = "BOOK_CATALOG_LOG";
/// Overrides where log output is appended.
pub const LOG_FILE_VAR: &str = "BOOK_CATALOG_LOG_FILE";

const LOG_FILE_NAME: &str = "book-catalog.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: Option<String>,
}

impl Config {
    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup. Blank
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let catalog_path = var(CATALOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE));
        let log_path = var(LOG_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_log_path);
        let log_filter = var(LOG_FILTER_VAR);

        Self {
            catalog_path,
            log_path,
            log_filter,
        }
    }
}

/// Per-user data directory, or the working directory when no home is known.
fn default_log_path() -> PathBuf {
    ProjectDirs::from("", "", "book-catalog")
        .map(|dirs| dirs.data_local_dir().join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}
