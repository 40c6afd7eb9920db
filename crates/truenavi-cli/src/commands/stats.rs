use std::io::Write;

use anyhow::{Context, Result};

use truenavi_lib::SqliteStore;

use crate::output::Console;

/// Print node and edge counts plus the graph version.
pub fn handle_stats<W: Write>(store: &SqliteStore, console: &mut Console<W>) -> Result<()> {
    let stats = store.stats().context("failed to read store statistics")?;
    console.stats(&stats)?;
    Ok(())
}
