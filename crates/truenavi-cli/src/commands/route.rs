//! Route command handler.

use std::io::Write;

use anyhow::{Result, bail};

use truenavi_lib::{RouteResult, SqliteStore, route};

use crate::commands::resolve_node_id;
use crate::output::Console;

/// Compute and print the shortest route between two nodes.
///
/// The result is printed in every case; a missing route is then reported as
/// an error so the process exits non-zero.
pub fn handle_route_command<W: Write>(
    store: &SqliteStore,
    from: &str,
    to: &str,
    console: &mut Console<W>,
) -> Result<()> {
    let start = resolve_node_id(store, from)?;
    let goal = resolve_node_id(store, to)?;

    let result = route(store, &start, &goal);
    console.route(&result)?;

    match result {
        RouteResult::Found { .. } => Ok(()),
        RouteResult::NotFound { reason } => bail!("no route from {} to {}: {}", from, to, reason),
        RouteResult::Failed { reason } => bail!("route query failed: {}", reason),
    }
}
