use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::BookField;

/// Everything a catalog operation can report back to the caller. Validation
/// and selection problems are expected during normal use and leave the catalog
/// untouched; the file variants carry the path that was involved.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("catalog file {} is not a valid book list", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Please fill in all fields. Missing: {}", field_list(.missing))]
    Validation { missing: Vec<BookField> },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The in-memory change was applied but could not be written out.
    #[error("failed to write catalog file {}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select a book to delete.")]
    Empty,

    #[error("Row {} is no longer in the catalog ({len} books).", .index + 1)]
    OutOfRange { index: usize, len: usize },
}

fn field_list(fields: &[BookField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
