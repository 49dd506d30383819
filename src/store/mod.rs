//! Catalog persistence split across logical submodules: the owned in-memory
//! store, the JSON file codec underneath it, and the selection type the UI
//! hands in for deletes.

mod catalog;
mod error;
mod file;
mod selection;

pub use catalog::CatalogStore;
pub use error::{CatalogError, SelectionError};
pub use file::{read_records, write_records};
pub use selection::Selection;
