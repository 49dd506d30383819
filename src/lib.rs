//! Core library surface for the Book Catalog terminal application.
//!
//! The store owns the catalog and its JSON file; the UI borrows it for
//! rendering and calls back into it for every change. `main.rs` only wires the
//! two together with the resolved configuration.
pub mod config;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use config::Config;

/// The domain types other layers manipulate.
pub use models::{BookField, BookRecord};

/// The persistence layer and its error type.
pub use store::{CatalogError, CatalogStore, Selection, SelectionError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
