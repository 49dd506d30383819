//! Ratatui front-end for the book catalog. It renders a read-only view of the
//! store it is handed and turns key presses into store calls; it never holds
//! catalog data of its own.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
