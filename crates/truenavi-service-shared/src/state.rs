//! Application state for the HTTP service.
//!
//! This module provides the shared state structure that axum handlers use to
//! reach the navigation store and the route query entry point.

use std::path::Path;
use std::sync::Arc;

use truenavi_lib::{Error as LibError, Router, SqliteStore};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to open or migrate the store.
    StoreOpen(LibError),

    /// The directory that should hold the database file does not exist.
    DirectoryNotFound(String),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreOpen(e) => write!(f, "failed to open navigation store: {}", e),
            Self::DirectoryNotFound(path) => write!(f, "database directory not found: {}", path),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreOpen(e) => Some(e),
            Self::DirectoryNotFound(_) => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        Self::StoreOpen(err)
    }
}

/// Shared application state for all axum handlers.
///
/// This struct is cheaply cloneable (using `Arc` internally) and should be
/// shared via axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use truenavi_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let stats = state.store().stats();
///     // ... use stats
/// }
///
/// let state = AppState::load("truenavi.db", false).unwrap();
/// let app = Router::new()
///     .route("/api/v1/nodes", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Router<SqliteStore>>,
}

impl AppState {
    /// Open the store at `db_path`, creating the file and schema if needed.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file
    /// * `cache_routes` - Reuse the routing graph until the next write
    pub fn load(db_path: impl AsRef<Path>, cache_routes: bool) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(AppStateError::DirectoryNotFound(
                    parent.display().to_string(),
                ));
            }
        }

        tracing::info!(path = %db_path.display(), "opening navigation store");
        let store = SqliteStore::open(db_path)?;
        let stats = store.stats()?;
        tracing::info!(
            nodes = stats.nodes,
            edges = stats.edges,
            version = stats.version,
            cache_routes,
            "navigation store ready"
        );

        Ok(Self::from_store(store, cache_routes))
    }

    /// Wrap an already opened store.
    ///
    /// This is useful for testing with in-memory stores.
    pub fn from_store(store: SqliteStore, cache_routes: bool) -> Self {
        let router = if cache_routes {
            Router::with_cache(store)
        } else {
            Router::new(store)
        };
        Self {
            inner: Arc::new(router),
        }
    }

    /// Access the node and edge store.
    pub fn store(&self) -> &SqliteStore {
        self.inner.source()
    }

    /// Access the route query entry point.
    pub fn router(&self) -> &Router<SqliteStore> {
        &self.inner
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cache_routes", &self.inner.is_caching())
            .finish()
    }
}
