use anyhow::Result;
use time::Date;

use crate::store::ClientStore;

mod app;
mod event_loop;
mod grid;
mod render;

/// Run the sheet editor for one starting date. Blocks until the user quits.
pub fn run(store: ClientStore, date: Date) -> Result<()> {
    app::run(store, date)
}
