//! Rendering of nodes, edges, and routes for the terminal.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use truenavi_lib::{Coordinates, Edge, Node, RouteResult, StoreStats};

use crate::terminal::{ColorPalette, format_distance};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn label(node: &Node) -> &str {
    node.name.as_deref().unwrap_or("<unnamed>")
}

fn position(coordinates: &Coordinates) -> String {
    format!("({:.6}, {:.6})", coordinates.latitude, coordinates.longitude)
}

pub fn write_node<W: Write>(out: &mut W, node: &Node, palette: &ColorPalette) -> io::Result<()> {
    writeln!(
        out,
        "{}{}{} {} {}{}{}",
        palette.white_bold,
        label(node),
        palette.reset,
        position(&node.coordinates),
        palette.gray,
        node.id,
        palette.reset,
    )
}

pub fn write_nodes<W: Write>(out: &mut W, nodes: &[Node], palette: &ColorPalette) -> io::Result<()> {
    writeln!(out, "Nodes ({}):", nodes.len())?;
    for node in nodes {
        write!(out, "  ")?;
        write_node(out, node, palette)?;
    }
    Ok(())
}

pub fn write_edge<W: Write>(out: &mut W, edge: &Edge, palette: &ColorPalette) -> io::Result<()> {
    writeln!(
        out,
        "{} <-> {} {}{}{} via {} waypoint(s) {}{}{}",
        edge.start,
        edge.end,
        palette.green,
        format_distance(edge.distance),
        palette.reset,
        edge.waypoints.len(),
        palette.gray,
        edge.id,
        palette.reset,
    )
}

pub fn write_edges<W: Write>(out: &mut W, edges: &[Edge], palette: &ColorPalette) -> io::Result<()> {
    writeln!(out, "Edges ({}):", edges.len())?;
    for edge in edges {
        write!(out, "  ")?;
        write_edge(out, edge, palette)?;
    }
    Ok(())
}

/// Text rendering of a route result.
///
/// ```text
/// Route: 2 hops, 222.39 km
///  START A (0.000000, 0.000000)
///    |  111.20 km
///        B (0.000000, 1.000000)
///    |  111.20 km
///   GOAL C (0.000000, 2.000000)
/// ```
pub fn write_route<W: Write>(
    out: &mut W,
    result: &RouteResult,
    palette: &ColorPalette,
) -> io::Result<()> {
    let (total_distance, path, edges) = match result {
        RouteResult::Found {
            total_distance,
            path,
            edges,
        } => (*total_distance, path, edges),
        RouteResult::NotFound { reason } | RouteResult::Failed { reason } => {
            return writeln!(out, "No route: {}", reason);
        }
    };

    writeln!(
        out,
        "Route: {} hops, {}",
        edges.len(),
        format_distance(total_distance)
    )?;

    let last = path.len().saturating_sub(1);
    for (index, node) in path.iter().enumerate() {
        let tag = if index == 0 {
            format!("{}START{}", palette.tag_start, palette.reset)
        } else if index == last {
            format!("{} GOAL{}", palette.tag_goal, palette.reset)
        } else {
            "     ".to_string()
        };
        writeln!(
            out,
            " {} {}{}{} {}",
            tag,
            palette.white_bold,
            label(node),
            palette.reset,
            position(&node.coordinates)
        )?;
        if let Some(edge) = edges.get(index) {
            writeln!(
                out,
                "   {}|{}  {}",
                palette.gray,
                palette.reset,
                format_distance(edge.distance)
            )?;
        }
    }
    Ok(())
}

pub fn write_stats<W: Write>(out: &mut W, stats: &StoreStats) -> io::Result<()> {
    writeln!(out, "Nodes:         {}", stats.nodes)?;
    writeln!(out, "Edges:         {}", stats.edges)?;
    writeln!(out, "Graph version: {}", stats.version)
}

/// Writes command results in the selected [`OutputFormat`].
pub struct Console<W> {
    out: W,
    format: OutputFormat,
    palette: ColorPalette,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, format: OutputFormat, palette: ColorPalette) -> Self {
        Self {
            out,
            format,
            palette,
        }
    }

    pub fn node(&mut self, node: &Node) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&mut self.out, node),
            OutputFormat::Text => write_node(&mut self.out, node, &self.palette),
        }
    }

    pub fn nodes(&mut self, nodes: &[Node]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&mut self.out, nodes),
            OutputFormat::Text => write_nodes(&mut self.out, nodes, &self.palette),
        }
    }

    pub fn edge(&mut self, edge: &Edge) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&mut self.out, edge),
            OutputFormat::Text => write_edge(&mut self.out, edge, &self.palette),
        }
    }

    pub fn edges(&mut self, edges: &[Edge]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&mut self.out, edges),
            OutputFormat::Text => write_edges(&mut self.out, edges, &self.palette),
        }
    }

    pub fn route(&mut self, result: &RouteResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&mut self.out, result),
            OutputFormat::Text => write_route(&mut self.out, result, &self.palette),
        }
    }

    pub fn stats(&mut self, stats: &StoreStats) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => write_json(&mut self.out, stats),
            OutputFormat::Text => write_stats(&mut self.out, stats),
        }
    }

    /// Consume the console and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str, longitude: f64) -> Node {
        Node {
            id: id.to_string(),
            name: Some(name.to_string()),
            coordinates: Coordinates::new(0.0, longitude),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn edge(start: &str, end: &str) -> Edge {
        Edge {
            id: format!("{start}-{end}"),
            start: start.to_string(),
            end: end.to_string(),
            waypoints: Vec::new(),
            geometry: Vec::new(),
            distance: 111_196.0,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn render(result: &RouteResult) -> String {
        let mut buffer = Vec::new();
        write_route(&mut buffer, result, &ColorPalette::plain()).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_route_text_lists_every_stop() {
        let result = RouteResult::Found {
            total_distance: 222_392.0,
            path: vec![node("a", "A", 0.0), node("b", "B", 1.0), node("c", "C", 2.0)],
            edges: vec![edge("a", "b"), edge("b", "c")],
        };
        let text = render(&result);

        assert!(text.starts_with("Route: 2 hops, 222.39 km"));
        assert!(text.contains("START A"));
        assert!(text.contains(" GOAL C"));
        assert_eq!(text.matches("111.20 km").count(), 2);
    }

    #[test]
    fn test_route_text_reports_missing_route() {
        let result = RouteResult::NotFound {
            reason: "No path exists between these nodes".to_string(),
        };
        assert_eq!(render(&result), "No route: No path exists between these nodes\n");
    }

    #[test]
    fn test_unnamed_node_label() {
        let mut unnamed = node("x", "X", 0.0);
        unnamed.name = None;
        let mut buffer = Vec::new();
        write_node(&mut buffer, &unnamed, &ColorPalette::plain()).unwrap();
        assert!(String::from_utf8(buffer).unwrap().starts_with("<unnamed>"));
    }

    #[test]
    fn test_console_switches_format() {
        let stats = StoreStats {
            nodes: 2,
            edges: 1,
            version: 3,
        };

        let mut text = Console::new(Vec::new(), OutputFormat::Text, ColorPalette::plain());
        text.stats(&stats).unwrap();
        let text = String::from_utf8(text.into_inner()).unwrap();
        assert!(text.contains("Graph version: 3"));

        let mut json = Console::new(Vec::new(), OutputFormat::Json, ColorPalette::plain());
        json.stats(&stats).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json.into_inner()).unwrap();
        assert_eq!(value["version"], 3);
    }

    #[test]
    fn test_json_output_ends_with_newline() {
        let mut buffer = Vec::new();
        write_json(&mut buffer, &edge("a", "b")).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\"distance\": 111196.0"));
    }
}
