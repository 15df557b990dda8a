//! Collection query interface.
//!
//! The scene catalog is an external service. This module defines the seams
//! the pipeline talks to, following the same split as the rest of the crate
//! between a blocking and an asynchronous path:
//!
//! - [`SceneCatalog`] answers filtered collection queries (blocking)
//! - [`NameResolver`] turns a scene into its product identifier, either
//!   blocking (export naming) or as a future (display layer naming)
//!
//! [`MemoryCatalog`] implements both over an in-memory record list. It backs
//! tests and the offline manifest workflow (see [`CatalogManifest`]).
//!
//! # Example
//!
//! ```ignore
//! use landsat_lst::catalog::{CatalogManifest, SceneCatalog, SceneFilter};
//!
//! let catalog = CatalogManifest::load(Path::new("scenes.json"))?.into_catalog()?;
//! let filters = [SceneFilter::Path(122), SceneFilter::Row(44)];
//! let count = catalog.size("LANDSAT/LC09/C02/T1_L2", &filters)?;
//! ```

mod filter;
mod manifest;
mod memory;

pub use filter::{InvalidMonth, MonthSet, SceneFilter};
pub use manifest::{CatalogManifest, ManifestScene};
pub use memory::{CatalogRecord, MemoryCatalog};

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::scene::{Scene, SceneId};

/// Errors from collection queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown collection '{0}'")]
    UnknownCollection(String),

    #[error("Failed to read catalog manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog manifest: {0}")]
    Manifest(String),

    #[error("Catalog service error: {0}")]
    Service(String),
}

/// Errors resolving a scene's product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("Scene {0} is not in the catalog")]
    UnknownScene(SceneId),

    #[error("Scene {0} has no LANDSAT_PRODUCT_ID property")]
    MissingProductId(SceneId),

    #[error("Name lookup for scene {scene} failed: {reason}")]
    Lookup { scene: SceneId, reason: String },
}

/// Filtered access to image collections.
pub trait SceneCatalog: Send + Sync {
    /// Number of scenes in `collection` matching every filter.
    ///
    /// This is a round trip to the catalog service.
    fn size(&self, collection: &str, filters: &[SceneFilter]) -> Result<usize, CatalogError>;

    /// Up to `limit` matching scenes, in catalog order.
    fn list(
        &self,
        collection: &str,
        filters: &[SceneFilter],
        limit: usize,
    ) -> Result<Vec<Scene>, CatalogError>;
}

/// Resolves human-readable product identifiers for scenes.
pub trait NameResolver: Send + Sync {
    /// Blocking lookup.
    fn product_id(&self, scene: &SceneId) -> Result<String, NamingError>;

    /// Asynchronous lookup. Callers that need the name must await it; the
    /// blocking path never depends on this future.
    fn resolve_product_id(
        &self,
        scene: &SceneId,
    ) -> impl Future<Output = Result<String, NamingError>> + Send;
}
