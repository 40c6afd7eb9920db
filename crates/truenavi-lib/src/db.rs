use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::edge::resolve_and_maintain;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::model::{
    new_id, normalize_name, timestamp_now, Edge, EdgeUpdate, NewEdge, NewNode, Node, NodeUpdate,
};
use crate::store::{GraphSnapshot, GraphSource};

/// Schema applied on open. Edges have no foreign keys on purpose: deleting a
/// node leaves its edges in place and the graph builder skips them.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS nodes (
    id TEXT PRIMARY KEY,
    name TEXT UNIQUE,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS edges (
    id TEXT PRIMARY KEY,
    start_id TEXT NOT NULL,
    end_id TEXT NOT NULL,
    waypoints TEXT NOT NULL,
    geometry TEXT NOT NULL,
    distance REAL NOT NULL CHECK (distance >= 0),
    created_at TEXT NOT NULL,
    CHECK (start_id <> end_id)
);
CREATE UNIQUE INDEX IF NOT EXISTS edges_unordered_pair
    ON edges (min(start_id, end_id), max(start_id, end_id));
CREATE INDEX IF NOT EXISTS edges_start ON edges (start_id);
CREATE INDEX IF NOT EXISTS edges_end ON edges (end_id);
CREATE TABLE IF NOT EXISTS graph_meta (
    key TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);
INSERT OR IGNORE INTO graph_meta (key, value) VALUES ('version', 0);
";

const NODE_COLUMNS: &str = "id, name, latitude, longitude, created_at";
const EDGE_COLUMNS: &str = "id, start_id, end_id, waypoints, geometry, distance, created_at";

/// Row counts and version of a store, used by health checks and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub nodes: usize,
    pub edges: usize,
    pub version: u64,
}

/// SQLite-backed node and edge store.
///
/// Every write runs in an immediate transaction that also bumps the graph
/// version. Edge writes recompute the edge distance inside that transaction.
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        debug!(path = %db_path.display(), "opening navigation store");
        let connection = Connection::open(db_path)?;
        connection.busy_timeout(Duration::from_secs(5))?;
        Self::from_connection(connection)
    }

    /// Create a private in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self> {
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.lock();
        let (nodes, edges): (i64, i64) = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM nodes), (SELECT COUNT(*) FROM edges)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(StoreStats {
            nodes: usize::try_from(nodes).unwrap_or_default(),
            edges: usize::try_from(edges).unwrap_or_default(),
            version: read_version(&conn)?,
        })
    }

    // -------------------------------------------------------------------------
    // Nodes
    // -------------------------------------------------------------------------

    pub fn create_node(&self, new: NewNode) -> Result<Node> {
        new.coordinates.validate()?;
        let node = Node {
            id: new_id(),
            name: normalize_name(new.name),
            coordinates: new.coordinates,
            created_at: timestamp_now(),
        };

        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO nodes (id, name, latitude, longitude, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                node.id,
                node.name,
                node.coordinates.latitude,
                node.coordinates.longitude,
                node.created_at
            ],
        )
        .map_err(|err| node_write_error(err, node.name.as_deref()))?;
        bump_version(&tx)?;
        tx.commit()?;

        info!(node = %node.id, name = node.name.as_deref().unwrap_or("-"), "created node");
        Ok(node)
    }

    /// Replace the given node fields. Moving a node re-measures every edge
    /// attached to it in the same transaction.
    pub fn update_node(&self, id: &str, update: NodeUpdate) -> Result<Node> {
        if let Some(coordinates) = &update.coordinates {
            coordinates.validate()?;
        }

        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut node = find_node(&tx, id)?.ok_or_else(|| Error::NodeNotFound { id: id.to_string() })?;

        let moved = update
            .coordinates
            .is_some_and(|coordinates| coordinates != node.coordinates);
        if let Some(name) = update.name {
            node.name = normalize_name(Some(name));
        }
        if let Some(coordinates) = update.coordinates {
            node.coordinates = coordinates;
        }

        tx.execute(
            "UPDATE nodes SET name = ?2, latitude = ?3, longitude = ?4 WHERE id = ?1",
            params![
                node.id,
                node.name,
                node.coordinates.latitude,
                node.coordinates.longitude
            ],
        )
        .map_err(|err| node_write_error(err, node.name.as_deref()))?;

        let refreshed = if moved {
            refresh_incident_edges(&tx, &node.id)?
        } else {
            0
        };
        bump_version(&tx)?;
        tx.commit()?;

        info!(node = %node.id, moved, refreshed_edges = refreshed, "updated node");
        Ok(node)
    }

    /// Delete a node. Edges referencing it are left in place.
    pub fn delete_node(&self, id: &str) -> Result<Node> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let node = find_node(&tx, id)?.ok_or_else(|| Error::NodeNotFound { id: id.to_string() })?;

        tx.execute("DELETE FROM nodes WHERE id = ?1", [id])?;
        let dangling: i64 = tx.query_row(
            "SELECT COUNT(*) FROM edges WHERE start_id = ?1 OR end_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        bump_version(&tx)?;
        tx.commit()?;

        if dangling > 0 {
            warn!(
                node = %id,
                dangling_edges = dangling,
                "deleted node is still referenced by edges"
            );
        }
        info!(node = %id, "deleted node");
        Ok(node)
    }

    /// Nodes within `radius_m` meters of `center`, nearest first.
    pub fn nodes_within(&self, center: Coordinates, radius_m: f64) -> Result<Vec<Node>> {
        center.validate()?;
        if !radius_m.is_finite() || radius_m < 0.0 {
            return Err(Error::validation(
                "radius must be a non-negative finite number",
            ));
        }

        let mut found: Vec<(f64, Node)> = self
            .all_nodes()?
            .into_iter()
            .map(|node| (center.distance_to(&node.coordinates), node))
            .filter(|(distance, _)| *distance <= radius_m)
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(found.into_iter().map(|(_, node)| node).collect())
    }

    // -------------------------------------------------------------------------
    // Edges
    // -------------------------------------------------------------------------

    pub fn edge_by_id(&self, id: &str) -> Result<Option<Edge>> {
        find_edge(&self.lock(), id)
    }

    /// Edges that have `node_id` as either endpoint.
    pub fn edges_for_node(&self, node_id: &str) -> Result<Vec<Edge>> {
        edges_touching(&self.lock(), node_id)
    }

    /// Insert an edge after measuring it against its endpoint nodes.
    pub fn create_edge(&self, new: NewEdge) -> Result<Edge> {
        let edge = Edge {
            id: new_id(),
            start: new.start,
            end: new.end,
            waypoints: new.waypoints,
            geometry: Vec::new(),
            distance: 0.0,
            created_at: timestamp_now(),
        };

        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let edge = resolve_and_maintain(edge, |id| find_node(&tx, id))?;
        tx.execute(
            &format!("INSERT INTO edges ({EDGE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                edge.id,
                edge.start,
                edge.end,
                serde_json::to_string(&edge.waypoints)?,
                serde_json::to_string(&edge.geometry)?,
                edge.distance,
                edge.created_at
            ],
        )
        .map_err(|err| edge_write_error(err, &edge))?;
        bump_version(&tx)?;
        tx.commit()?;

        info!(
            edge = %edge.id,
            start = %edge.start,
            end = %edge.end,
            distance = edge.distance,
            "created edge"
        );
        Ok(edge)
    }

    /// Apply `update` and re-measure the edge before it is written.
    pub fn update_edge(&self, id: &str, update: EdgeUpdate) -> Result<Edge> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut edge = find_edge(&tx, id)?.ok_or_else(|| Error::EdgeNotFound { id: id.to_string() })?;

        if let Some(start) = update.start {
            edge.start = start;
        }
        if let Some(end) = update.end {
            edge.end = end;
        }
        if let Some(waypoints) = update.waypoints {
            edge.waypoints = waypoints;
        }

        let edge = resolve_and_maintain(edge, |node| find_node(&tx, node))?;
        write_edge_row(&tx, &edge).map_err(|err| match err {
            Error::DataSource(inner) => edge_write_error(inner, &edge),
            other => other,
        })?;
        bump_version(&tx)?;
        tx.commit()?;

        info!(edge = %edge.id, distance = edge.distance, "updated edge");
        Ok(edge)
    }

    pub fn delete_edge(&self, id: &str) -> Result<Edge> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let edge = find_edge(&tx, id)?.ok_or_else(|| Error::EdgeNotFound { id: id.to_string() })?;
        tx.execute("DELETE FROM edges WHERE id = ?1", [id])?;
        bump_version(&tx)?;
        tx.commit()?;

        info!(edge = %id, "deleted edge");
        Ok(edge)
    }
}

impl GraphSource for SqliteStore {
    fn all_nodes(&self) -> Result<Vec<Node>> {
        load_nodes(&self.lock())
    }

    fn all_edges(&self) -> Result<Vec<Edge>> {
        load_edges(&self.lock())
    }

    fn node_by_id(&self, id: &str) -> Result<Option<Node>> {
        find_node(&self.lock(), id)
    }

    fn graph_version(&self) -> Result<u64> {
        read_version(&self.lock())
    }

    fn snapshot(&self) -> Result<GraphSnapshot> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let snapshot = GraphSnapshot {
            version: read_version(&tx)?,
            nodes: load_nodes(&tx)?,
            edges: load_edges(&tx)?,
        };
        tx.commit()?;

        debug!(
            version = snapshot.version,
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "loaded graph snapshot"
        );
        Ok(snapshot)
    }
}

/// Re-measure every edge touching `node_id`. Edges whose other endpoint has
/// been deleted are left untouched.
fn refresh_incident_edges(connection: &Connection, node_id: &str) -> Result<usize> {
    let mut refreshed = 0usize;
    for edge in edges_touching(connection, node_id)? {
        let edge_id = edge.id.clone();
        match resolve_and_maintain(edge, |id| find_node(connection, id)) {
            Ok(edge) => {
                write_edge_row(connection, &edge)?;
                refreshed += 1;
            }
            Err(Error::ReferentialIntegrity { node }) => {
                warn!(
                    edge = %edge_id,
                    missing_node = %node,
                    "skipped re-measuring edge with a missing endpoint"
                );
            }
            Err(err) => return Err(err),
        }
    }
    Ok(refreshed)
}

fn write_edge_row(connection: &Connection, edge: &Edge) -> Result<()> {
    connection.execute(
        "UPDATE edges
         SET start_id = ?2, end_id = ?3, waypoints = ?4, geometry = ?5, distance = ?6
         WHERE id = ?1",
        params![
            edge.id,
            edge.start,
            edge.end,
            serde_json::to_string(&edge.waypoints)?,
            serde_json::to_string(&edge.geometry)?,
            edge.distance
        ],
    )?;
    Ok(())
}

fn bump_version(connection: &Connection) -> Result<()> {
    connection.execute(
        "UPDATE graph_meta SET value = value + 1 WHERE key = 'version'",
        [],
    )?;
    Ok(())
}

fn read_version(connection: &Connection) -> Result<u64> {
    let version: i64 = connection.query_row(
        "SELECT value FROM graph_meta WHERE key = 'version'",
        [],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(version).unwrap_or_default())
}

fn find_node(connection: &Connection, id: &str) -> Result<Option<Node>> {
    let node = connection
        .query_row(
            &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1"),
            [id],
            row_to_node,
        )
        .optional()?;
    Ok(node)
}

fn find_edge(connection: &Connection, id: &str) -> Result<Option<Edge>> {
    let edge = connection
        .query_row(
            &format!("SELECT {EDGE_COLUMNS} FROM edges WHERE id = ?1"),
            [id],
            row_to_edge,
        )
        .optional()?;
    Ok(edge)
}

fn load_nodes(connection: &Connection) -> Result<Vec<Node>> {
    let mut stmt =
        connection.prepare(&format!("SELECT {NODE_COLUMNS} FROM nodes ORDER BY created_at, id"))?;
    let rows = stmt.query_map([], row_to_node)?;

    let mut nodes = Vec::new();
    for entry in rows {
        nodes.push(entry?);
    }
    Ok(nodes)
}

fn load_edges(connection: &Connection) -> Result<Vec<Edge>> {
    let mut stmt =
        connection.prepare(&format!("SELECT {EDGE_COLUMNS} FROM edges ORDER BY created_at, id"))?;
    let rows = stmt.query_map([], row_to_edge)?;

    let mut edges = Vec::new();
    for entry in rows {
        edges.push(entry?);
    }
    Ok(edges)
}

fn edges_touching(connection: &Connection, node_id: &str) -> Result<Vec<Edge>> {
    let mut stmt = connection.prepare(&format!(
        "SELECT {EDGE_COLUMNS} FROM edges WHERE start_id = ?1 OR end_id = ?1 ORDER BY created_at, id"
    ))?;
    let rows = stmt.query_map([node_id], row_to_edge)?;

    let mut edges = Vec::new();
    for entry in rows {
        edges.push(entry?);
    }
    Ok(edges)
}

fn row_to_node(row: &Row<'_>) -> rusqlite::Result<Node> {
    Ok(Node {
        id: row.get(0)?,
        name: row.get(1)?,
        coordinates: Coordinates::new(row.get(2)?, row.get(3)?),
        created_at: row.get(4)?,
    })
}

fn row_to_edge(row: &Row<'_>) -> rusqlite::Result<Edge> {
    Ok(Edge {
        id: row.get(0)?,
        start: row.get(1)?,
        end: row.get(2)?,
        waypoints: decode_coordinates(row, 3)?,
        geometry: decode_coordinates(row, 4)?,
        distance: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn decode_coordinates(row: &Row<'_>, index: usize) -> rusqlite::Result<Vec<Coordinates>> {
    let text: String = row.get(index)?;
    serde_json::from_str(&text)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn node_write_error(err: rusqlite::Error, name: Option<&str>) -> Error {
    match name {
        Some(name) if is_unique_violation(&err) => Error::DuplicateNodeName {
            name: name.to_string(),
        },
        _ => Error::DataSource(err),
    }
}

fn edge_write_error(err: rusqlite::Error, edge: &Edge) -> Error {
    if is_unique_violation(&err) {
        Error::DuplicateEdge {
            start: edge.start.clone(),
            end: edge.end.clone(),
        }
    } else {
        Error::DataSource(err)
    }
}
