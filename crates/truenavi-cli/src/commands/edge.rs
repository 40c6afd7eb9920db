//! `edge` subcommands.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use tracing::info;

use truenavi_lib::{Coordinates, EdgeUpdate, GraphSource, NewEdge, SqliteStore};

use crate::commands::{parse_coordinates, resolve_node_id};
use crate::output::Console;

#[derive(Subcommand, Debug)]
pub enum EdgeCommand {
    /// Connect two nodes. The distance is measured along the waypoints.
    Add {
        /// Start node id or name.
        #[arg(long)]
        start: String,
        /// End node id or name.
        #[arg(long)]
        end: String,
        /// Intermediate point as LAT,LNG. Repeat in travel order.
        #[arg(long = "via", value_parser = parse_coordinates, allow_hyphen_values = true)]
        waypoints: Vec<Coordinates>,
    },
    /// List edges, optionally only those touching a node.
    List {
        /// Node id or name.
        #[arg(long)]
        node: Option<String>,
    },
    /// Show a single edge.
    Show { id: String },
    /// Change an edge's endpoints or waypoints.
    Update {
        id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Replacement waypoints as LAT,LNG.
        #[arg(long = "via", value_parser = parse_coordinates, allow_hyphen_values = true)]
        waypoints: Vec<Coordinates>,
        /// Drop all waypoints.
        #[arg(long, conflicts_with = "waypoints")]
        straight: bool,
    },
    /// Delete an edge.
    Remove { id: String },
}

pub fn handle_edge_command<W: Write>(
    store: &SqliteStore,
    command: EdgeCommand,
    console: &mut Console<W>,
) -> Result<()> {
    match command {
        EdgeCommand::Add {
            start,
            end,
            waypoints,
        } => {
            let edge = store
                .create_edge(NewEdge {
                    start: resolve_node_id(store, &start)?,
                    end: resolve_node_id(store, &end)?,
                    waypoints,
                })
                .context("failed to create edge")?;
            info!(id = %edge.id, distance = edge.distance, "edge created");
            console.edge(&edge)?;
        }
        EdgeCommand::List { node: None } => {
            let edges = store.all_edges().context("failed to list edges")?;
            console.edges(&edges)?;
        }
        EdgeCommand::List { node: Some(node) } => {
            let node_id = resolve_node_id(store, &node)?;
            let edges = store
                .edges_for_node(&node_id)
                .context("failed to list edges")?;
            console.edges(&edges)?;
        }
        EdgeCommand::Show { id } => {
            let edge = store
                .edge_by_id(&id)
                .context("failed to look up edge")?
                .with_context(|| format!("edge {} not found", id))?;
            console.edge(&edge)?;
        }
        EdgeCommand::Update {
            id,
            start,
            end,
            waypoints,
            straight,
        } => {
            let update = EdgeUpdate {
                start: start.map(|s| resolve_node_id(store, &s)).transpose()?,
                end: end.map(|e| resolve_node_id(store, &e)).transpose()?,
                waypoints: (straight || !waypoints.is_empty()).then_some(waypoints),
            };
            if update.is_empty() {
                bail!("nothing to update: pass --start, --end, --via or --straight");
            }
            let edge = store
                .update_edge(&id, update)
                .with_context(|| format!("failed to update edge {}", id))?;
            console.edge(&edge)?;
        }
        EdgeCommand::Remove { id } => {
            let edge = store
                .delete_edge(&id)
                .with_context(|| format!("failed to delete edge {}", id))?;
            console.edge(&edge)?;
        }
    }
    Ok(())
}
