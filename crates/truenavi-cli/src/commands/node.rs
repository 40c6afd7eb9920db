//! `node` subcommands.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use tracing::info;

use truenavi_lib::{Coordinates, GraphSource, NewNode, NodeUpdate, SqliteStore};

use crate::commands::parse_coordinates;
use crate::output::Console;

#[derive(Subcommand, Debug)]
pub enum NodeCommand {
    /// Create a node.
    Add {
        /// Optional unique display name.
        #[arg(long)]
        name: Option<String>,
        /// Position as LAT,LNG in decimal degrees.
        #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
        at: Coordinates,
    },
    /// List every node.
    List,
    /// Show a single node.
    Show { id: String },
    /// Rename or move a node. Moving re-measures its edges.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
        at: Option<Coordinates>,
    },
    /// Delete a node. Its edges are kept but no longer routable.
    Remove { id: String },
    /// Nodes within a radius of a point, nearest first.
    Near {
        #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
        at: Coordinates,
        /// Search radius in kilometers.
        #[arg(long)]
        radius_km: f64,
    },
}

pub fn handle_node_command<W: Write>(
    store: &SqliteStore,
    command: NodeCommand,
    console: &mut Console<W>,
) -> Result<()> {
    match command {
        NodeCommand::Add { name, at } => {
            let node = store
                .create_node(NewNode {
                    name,
                    coordinates: at,
                })
                .context("failed to create node")?;
            info!(id = %node.id, "node created");
            console.node(&node)?;
        }
        NodeCommand::List => {
            let nodes = store.all_nodes().context("failed to list nodes")?;
            console.nodes(&nodes)?;
        }
        NodeCommand::Show { id } => {
            let node = store
                .node_by_id(&id)
                .context("failed to look up node")?
                .with_context(|| format!("node {} not found", id))?;
            console.node(&node)?;
        }
        NodeCommand::Update { id, name, at } => {
            if name.is_none() && at.is_none() {
                bail!("nothing to update: pass --name and/or --at");
            }
            let node = store
                .update_node(
                    &id,
                    NodeUpdate {
                        name,
                        coordinates: at,
                    },
                )
                .with_context(|| format!("failed to update node {}", id))?;
            console.node(&node)?;
        }
        NodeCommand::Remove { id } => {
            let node = store
                .delete_node(&id)
                .with_context(|| format!("failed to delete node {}", id))?;
            console.node(&node)?;
        }
        NodeCommand::Near { at, radius_km } => {
            if !radius_km.is_finite() || radius_km < 0.0 {
                bail!("--radius-km must be a non-negative number");
            }
            let nodes = store
                .nodes_within(at, radius_km * 1000.0)
                .context("failed to search nodes")?;
            console.nodes(&nodes)?;
        }
    }
    Ok(())
}
