//! Binary entry point: resolve configuration, optionally start logging, load
//! the catalog, and hand the store to the TUI until the user quits.
use anyhow::Context;
use book_catalog::{logging, run_app, App, CatalogStore, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    logging::init(&config)?;

    let store = CatalogStore::load(&config.catalog_path).with_context(|| {
        format!(
            "could not open the catalog at {}",
            config.catalog_path.display()
        )
    })?;

    let mut app = App::new(store);
    run_app(&mut app)?;

    let store = app.into_store();
    if !store.is_synced() {
        eprintln!(
            "warning: the last changes were not written to {}",
            store.path().display()
        );
    }
    Ok(())
}
