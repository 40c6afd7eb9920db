use thiserror::Error;

use crate::model::NodeId;

/// Convenient result alias for the TrueNavi library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An edge references a node that does not exist at write time.
    #[error("edge references unknown node {node}")]
    ReferentialIntegrity { node: NodeId },

    /// Input failed validation before any distance computation ran.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// An edge already connects the same unordered pair of nodes.
    #[error("an edge between {start} and {end} already exists")]
    DuplicateEdge { start: NodeId, end: NodeId },

    /// Another node already uses the requested display name.
    #[error("a node named '{name}' already exists")]
    DuplicateNodeName { name: String },

    /// Raised when a node lookup by identifier found nothing.
    #[error("node {id} not found")]
    NodeNotFound { id: String },

    /// Raised when an edge lookup by identifier found nothing.
    #[error("edge {id} not found")]
    EdgeNotFound { id: String },

    /// The record store is unreachable or a query failed.
    #[error("data source error: {0}")]
    DataSource(#[from] rusqlite::Error),

    /// Stored coordinate payloads could not be encoded or decoded.
    #[error("failed to serialize coordinates: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`] value.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Whether the error originates from the backing store rather than the
    /// caller's input.
    pub fn is_data_source(&self) -> bool {
        matches!(
            self,
            Error::DataSource(_) | Error::Serialization(_) | Error::Io(_)
        )
    }
}
