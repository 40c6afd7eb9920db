//! Keeps an edge's stored distance consistent with its endpoints.
//!
//! Every write that changes an edge's `start`, `end`, or waypoints must pass
//! the record through [`resolve_and_maintain`] before it is persisted. The
//! store does this inside the same transaction as the write, so readers never
//! see endpoints and distance out of step.

use std::iter;

use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::{path_distance, Coordinates};
use crate::model::{Edge, Node};

/// Recompute `geometry` and `distance` for `edge` from already-fetched endpoint
/// nodes.
///
/// With no waypoints the geometry is the straight segment between the two
/// nodes. Otherwise it runs start → waypoints → end, and the distance is the
/// sum of the rounded haversine legs along it.
pub fn maintain_edge_distance(mut edge: Edge, start: &Node, end: &Node) -> Result<Edge> {
    if edge.start == edge.end {
        return Err(Error::validation("edge endpoints must be distinct nodes"));
    }
    if start.id != edge.start || end.id != edge.end {
        return Err(Error::validation(format!(
            "endpoint nodes {}/{} do not match edge {}/{}",
            start.id, end.id, edge.start, edge.end
        )));
    }
    validate_waypoints(&edge.waypoints)?;

    edge.geometry = iter::once(start.coordinates)
        .chain(edge.waypoints.iter().copied())
        .chain(iter::once(end.coordinates))
        .collect();
    edge.distance = path_distance(&edge.geometry);

    debug!(
        edge = %edge.id,
        waypoints = edge.waypoints.len(),
        distance = edge.distance,
        "maintained edge distance"
    );
    Ok(edge)
}

/// Fetch both endpoints through `lookup` and then maintain the edge.
///
/// Fails with [`Error::ReferentialIntegrity`] when either endpoint is missing;
/// the caller must abort the write in that case.
pub fn resolve_and_maintain<F>(edge: Edge, mut lookup: F) -> Result<Edge>
where
    F: FnMut(&str) -> Result<Option<Node>>,
{
    if edge.start == edge.end {
        return Err(Error::validation("edge endpoints must be distinct nodes"));
    }

    let start = lookup(&edge.start)?.ok_or_else(|| Error::ReferentialIntegrity {
        node: edge.start.clone(),
    })?;
    let end = lookup(&edge.end)?.ok_or_else(|| Error::ReferentialIntegrity {
        node: edge.end.clone(),
    })?;

    maintain_edge_distance(edge, &start, &end)
}

fn validate_waypoints(waypoints: &[Coordinates]) -> Result<()> {
    for (index, waypoint) in waypoints.iter().enumerate() {
        waypoint.validate().map_err(|err| match err {
            Error::Validation { message } => {
                Error::validation(format!("waypoint {index}: {message}"))
            }
            other => other,
        })?;
    }
    Ok(())
}
