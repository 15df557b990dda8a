//! In-memory catalog backend.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{CatalogError, NameResolver, NamingError, SceneCatalog, SceneFilter};
use crate::scene::{Scene, SceneId, SceneProperties};
use crate::sensor::SensorId;

/// One scene as stored by the catalog.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    pub id: SceneId,
    pub collection: String,
    pub product_id: Option<String>,
    pub properties: SceneProperties,
    pub bands: Vec<String>,
}

impl CatalogRecord {
    fn to_scene(&self) -> Scene {
        Scene::new(
            self.id.clone(),
            self.properties.clone(),
            self.bands.iter().cloned(),
        )
    }
}

/// Catalog over a fixed list of records.
///
/// Query and name-lookup round trips are counted so callers can verify how
/// often they hit the catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    collections: BTreeSet<String>,
    records: Vec<Arc<CatalogRecord>>,
    naming_latency: Option<Duration>,
    size_calls: AtomicUsize,
    list_calls: AtomicUsize,
    name_calls: AtomicUsize,
}

impl MemoryCatalog {
    /// An empty catalog that knows no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty catalog that knows the four Landsat Level-2 collections.
    pub fn landsat() -> Self {
        let mut catalog = Self::new();
        for sensor in SensorId::ALL {
            catalog.register_collection(sensor.profile().collection_id);
        }
        catalog
    }

    pub fn register_collection(&mut self, collection: impl Into<String>) {
        self.collections.insert(collection.into());
    }

    /// Add a record, registering its collection if needed.
    pub fn insert(&mut self, record: CatalogRecord) {
        self.collections.insert(record.collection.clone());
        self.records.push(Arc::new(record));
    }

    pub fn with_record(mut self, record: CatalogRecord) -> Self {
        self.insert(record);
        self
    }

    /// Delay applied to asynchronous name lookups.
    pub fn with_naming_latency(mut self, latency: Duration) -> Self {
        self.naming_latency = Some(latency);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn size_calls(&self) -> usize {
        self.size_calls.load(Ordering::Relaxed)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    pub fn name_calls(&self) -> usize {
        self.name_calls.load(Ordering::Relaxed)
    }

    fn matching<'a>(
        &'a self,
        collection: &'a str,
        filters: &'a [SceneFilter],
    ) -> Result<impl Iterator<Item = &'a Arc<CatalogRecord>> + 'a, CatalogError> {
        if !self.collections.contains(collection) {
            return Err(CatalogError::UnknownCollection(collection.to_string()));
        }
        Ok(self.records.iter().filter(move |record| {
            record.collection == collection
                && filters.iter().all(|f| f.matches(&record.properties))
        }))
    }

    fn lookup(&self, scene: &SceneId) -> Result<String, NamingError> {
        let record = self
            .records
            .iter()
            .find(|r| &r.id == scene)
            .ok_or_else(|| NamingError::UnknownScene(scene.clone()))?;
        record
            .product_id
            .clone()
            .ok_or_else(|| NamingError::MissingProductId(scene.clone()))
    }
}

impl SceneCatalog for MemoryCatalog {
    fn size(&self, collection: &str, filters: &[SceneFilter]) -> Result<usize, CatalogError> {
        self.size_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.matching(collection, filters)?.count())
    }

    fn list(
        &self,
        collection: &str,
        filters: &[SceneFilter],
        limit: usize,
    ) -> Result<Vec<Scene>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .matching(collection, filters)?
            .take(limit)
            .map(|record| record.to_scene())
            .collect())
    }
}

impl NameResolver for MemoryCatalog {
    fn product_id(&self, scene: &SceneId) -> Result<String, NamingError> {
        self.name_calls.fetch_add(1, Ordering::Relaxed);
        self.lookup(scene)
    }

    fn resolve_product_id(
        &self,
        scene: &SceneId,
    ) -> impl Future<Output = Result<String, NamingError>> + Send {
        self.name_calls.fetch_add(1, Ordering::Relaxed);
        let result = self.lookup(scene);
        let latency = self.naming_latency;
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        }
    }
}
