//! Subcommand handlers.
//!
//! Each handler takes the open store and a [`Console`](crate::output::Console)
//! and keeps `main.rs` focused on argument parsing.

pub mod edge;
pub mod node;
pub mod route;
pub mod stats;

use anyhow::{Context, Result};

use truenavi_lib::{Coordinates, GraphSource, SqliteStore};

/// Resolve a node reference given either its id or its name.
///
/// References that match neither are returned unchanged so the store can
/// report them.
pub fn resolve_node_id(store: &SqliteStore, reference: &str) -> Result<String> {
    if store
        .node_by_id(reference)
        .context("failed to look up node")?
        .is_some()
    {
        return Ok(reference.to_string());
    }

    let nodes = store.all_nodes().context("failed to list nodes")?;
    Ok(nodes
        .into_iter()
        .find(|node| node.name.as_deref() == Some(reference))
        .map(|node| node.id)
        .unwrap_or_else(|| reference.to_string()))
}

/// Parse a `LAT,LNG` pair from the command line.
pub fn parse_coordinates(value: &str) -> std::result::Result<Coordinates, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got '{}'", value))?;
    let number = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{}': {}", part.trim(), e))
    };
    let coordinates = Coordinates::new(number(lat)?, number(lng)?);
    coordinates.validate().map_err(|e| e.to_string())?;
    Ok(coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use truenavi_lib::NewNode;

    #[test]
    fn test_parse_coordinates() {
        let parsed = parse_coordinates("51.5, -0.12").unwrap();
        assert_eq!(parsed, Coordinates::new(51.5, -0.12));
    }

    #[test]
    fn test_parse_coordinates_rejects_bad_input() {
        assert!(parse_coordinates("51.5").is_err());
        assert!(parse_coordinates("north,0").is_err());
        assert!(parse_coordinates("91,0").is_err());
    }

    #[test]
    fn test_resolve_node_by_name() {
        let store = SqliteStore::open_in_memory().unwrap();
        let node = store
            .create_node(NewNode {
                name: Some("Depot".to_string()),
                coordinates: Coordinates::new(1.0, 1.0),
            })
            .unwrap();

        assert_eq!(resolve_node_id(&store, "Depot").unwrap(), node.id);
        assert_eq!(resolve_node_id(&store, &node.id).unwrap(), node.id);
        assert_eq!(resolve_node_id(&store, "elsewhere").unwrap(), "elsewhere");
    }
}
