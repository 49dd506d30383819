use std::mem;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::error::{CatalogError, SelectionError};
use super::file::{read_records, write_records};
use super::selection::Selection;
use crate::models::BookRecord;

/// The authoritative, ordered list of books plus the file it is mirrored to.
///
/// Every mutation rewrites the whole file before returning. The UI only ever
/// reads through [`CatalogStore::books`]; nothing displayed is fed back into
/// persistence.
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    books: Vec<BookRecord>,
    synced: bool,
}

impl CatalogStore {
    /// Hydrate the store from `path`. A missing file gives an empty catalog;
    /// the file is not created until the first write.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let books = read_records(&path)?.unwrap_or_default();
        info!("loaded {} books from {}", books.len(), path.display());
        Ok(Self {
            path,
            books,
            synced: true,
        })
    }

    /// File the catalog is written to on every change.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All books in insertion order.
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    /// Number of books in the catalog.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog holds no books at all.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Look up a single row for the details view.
    pub fn details(&self, index: usize) -> Option<&BookRecord> {
        self.books.get(index)
    }

    /// Whether the file on disk matches the in-memory list. Goes false when a
    /// write fails and back to true after the next successful one.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Append a book and rewrite the file. Every field must be non-blank; the
    /// stored record has surrounding whitespace trimmed. Returns the row index
    /// of the new book.
    ///
    /// A [`CatalogError::Persist`] means the book *was* added in memory but the
    /// file is stale; see [`CatalogStore::is_synced`].
    pub fn add(&mut self, record: BookRecord) -> Result<usize, CatalogError> {
        let missing = record.blank_fields();
        if !missing.is_empty() {
            debug!("rejected book with blank fields: {missing:?}");
            return Err(CatalogError::Validation { missing });
        }

        let record = record.trimmed();
        info!("adding {record}");
        self.books.push(record);
        self.persist()?;
        Ok(self.books.len() - 1)
    }

    /// Remove every selected row and rewrite the file. The remaining books
    /// keep their relative order; the removed ones come back in catalog order.
    ///
    /// An empty selection, or one naming a row that does not exist, removes
    /// nothing.
    pub fn remove(&mut self, selection: &Selection) -> Result<Vec<BookRecord>, CatalogError> {
        if selection.is_empty() {
            return Err(SelectionError::Empty.into());
        }
        let len = self.books.len();
        if let Some(index) = selection.iter().find(|index| *index >= len) {
            return Err(SelectionError::OutOfRange { index, len }.into());
        }

        let (removed, kept): (Vec<_>, Vec<_>) = mem::take(&mut self.books)
            .into_iter()
            .enumerate()
            .partition(|(index, _)| selection.contains(*index));
        self.books = kept.into_iter().map(|(_, book)| book).collect();
        let removed: Vec<BookRecord> = removed.into_iter().map(|(_, book)| book).collect();

        info!("removed {} books, {} remain", removed.len(), self.books.len());
        self.persist()?;
        Ok(removed)
    }

    /// Overwrite the file with the current list.
    pub fn persist(&mut self) -> Result<(), CatalogError> {
        match write_records(&self.path, &self.books) {
            Ok(()) => {
                self.synced = true;
                Ok(())
            }
            Err(err) => {
                warn!("catalog left unsaved: {err}");
                self.synced = false;
                Err(err)
            }
        }
    }
}
