//! JSON scene manifests for offline catalogs.
//!
//! A manifest lists scene metadata exported from the catalog service so the
//! pipeline can run selection and export preparation without a live
//! connection:
//!
//! ```json
//! {
//!   "scenes": [
//!     {
//!       "product_id": "LC09_L2SP_122044_20220915_20220916_02_T1",
//!       "cloud_cover": 12.5,
//!       "footprint": { "coordinates": [[113.0, 22.0], [115.0, 22.0], [115.0, 24.0], [113.0, 22.0]] }
//!     }
//!   ]
//! }
//! ```
//!
//! Fields omitted from a scene (`id`, `collection`, `acquired`, `path`,
//! `row`, `bands`) are derived from the parsed product ID and the sensor
//! profile.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::memory::{CatalogRecord, MemoryCatalog};
use super::CatalogError;
use crate::scene::{Footprint, ProductId, SceneId, SceneProperties};
use crate::sensor::{SensorId, SensorProfile};

/// One scene entry of a manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestScene {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub acquired: Option<NaiveDate>,
    #[serde(default)]
    pub path: Option<u16>,
    #[serde(default)]
    pub row: Option<u16>,
    pub cloud_cover: f64,
    #[serde(default)]
    pub footprint: Option<Footprint>,
    #[serde(default)]
    pub bands: Option<Vec<String>>,
}

/// A manifest document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub scenes: Vec<ManifestScene>,
}

impl CatalogManifest {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::Manifest(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build a catalog knowing the Landsat collections plus every manifest
    /// scene.
    pub fn into_catalog(self) -> Result<MemoryCatalog, CatalogError> {
        let mut catalog = MemoryCatalog::landsat();
        let mut product_ids = HashMap::new();
        for (index, scene) in self.scenes.into_iter().enumerate() {
            let record = scene
                .into_record()
                .map_err(|reason| CatalogError::Manifest(format!("scene #{index}: {reason}")))?;
            if let Some(product_id) = &record.product_id {
                if let Some(first) = product_ids.insert(product_id.clone(), index) {
                    return Err(CatalogError::Manifest(format!(
                        "scene #{index}: product_id {product_id} already used by scene #{first}"
                    )));
                }
            }
            catalog.insert(record);
        }
        Ok(catalog)
    }
}

impl ManifestScene {
    fn into_record(self) -> Result<CatalogRecord, String> {
        let parsed = self
            .product_id
            .as_deref()
            .map(ProductId::parse)
            .transpose()
            .map_err(|e| e.to_string())?;

        let profile = self.profile(parsed.as_ref())?;
        let collection = match (&self.collection, profile) {
            (Some(collection), _) => collection.clone(),
            (None, Some(profile)) => profile.collection_id.to_string(),
            (None, None) => return Err("no collection and no product_id".to_string()),
        };

        let acquired = self
            .acquired
            .or(parsed.as_ref().map(|p| p.acquired))
            .ok_or("missing acquisition date")?;
        let path = self
            .path
            .or(parsed.as_ref().map(|p| p.path))
            .ok_or("missing WRS path")?;
        let row = self
            .row
            .or(parsed.as_ref().map(|p| p.row))
            .ok_or("missing WRS row")?;

        if !(0.0..=100.0).contains(&self.cloud_cover) {
            return Err(format!("cloud cover {} outside 0-100", self.cloud_cover));
        }

        let id = self
            .id
            .or_else(|| self.product_id.clone())
            .ok_or("scene needs an id or a product_id")?;

        let bands = match (self.bands, profile) {
            (Some(bands), _) => bands,
            (None, Some(profile)) => default_bands(profile),
            (None, None) => Vec::new(),
        };

        Ok(CatalogRecord {
            id: SceneId::new(id),
            collection,
            product_id: self.product_id,
            properties: SceneProperties {
                acquired,
                path,
                row,
                cloud_cover: self.cloud_cover,
                footprint: self.footprint.unwrap_or_default(),
            },
            bands,
        })
    }

    /// Sensor profile implied by the collection or the product ID. Both must
    /// agree when both are present.
    fn profile(&self, parsed: Option<&ProductId>) -> Result<Option<&'static SensorProfile>, String> {
        let from_collection = self.collection.as_deref().and_then(|collection| {
            SensorId::ALL
                .into_iter()
                .map(|sensor| sensor.profile())
                .find(|p| p.collection_id == collection)
        });
        let from_product = parsed.map(|p| p.sensor.profile());

        match (from_collection, from_product) {
            (Some(c), Some(p)) if c.sensor != p.sensor => Err(format!(
                "product {} is {} but collection {} is {}",
                parsed.map(|p| p.as_str()).unwrap_or_default(),
                p.sensor,
                c.collection_id,
                c.sensor
            )),
            (Some(c), _) => Ok(Some(c)),
            (None, p) => Ok(p),
        }
    }
}

fn default_bands(profile: &SensorProfile) -> Vec<String> {
    let mut bands: Vec<String> = profile
        .required_bands()
        .into_iter()
        .map(String::from)
        .collect();
    for band in profile.true_color_bands {
        if !bands.iter().any(|b| b == band) {
            bands.push(band.to_string());
        }
    }
    bands
}
