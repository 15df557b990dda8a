//! Scene value type.
//!
//! A [`Scene`] is one satellite acquisition: catalog metadata plus a mapping
//! from band name to [`Raster`]. Scenes are values. Adding a derived band
//! produces a new scene and leaves the original untouched, so one
//! transform can never interfere with another scene's bands.

mod product_id;

pub use product_id::{ProductId, ProductIdError};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::Raster;

/// Errors raised when a scene lacks something a transform needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Scene {scene} has no band '{band}'")]
    MissingBand { scene: SceneId, band: String },
}

/// Catalog-assigned scene identifier (the system index, not the product ID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SceneId(String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scene footprint as a closed lon/lat ring (WGS84 degrees).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Footprint {
    pub coordinates: Vec<[f64; 2]>,
}

impl Footprint {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self { coordinates }
    }

    /// Axis-aligned rectangle from west/south/east/north bounds.
    pub fn from_bounds(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::new(vec![
            [west, south],
            [east, south],
            [east, north],
            [west, north],
            [west, south],
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Metadata a catalog query can filter on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneProperties {
    pub acquired: NaiveDate,
    pub path: u16,
    pub row: u16,
    /// Scene cloud cover in percent.
    pub cloud_cover: f64,
    #[serde(default)]
    pub footprint: Footprint,
}

impl SceneProperties {
    /// Acquisition calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.acquired.month()
    }
}

/// One acquisition with its named bands.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    id: SceneId,
    properties: Arc<SceneProperties>,
    bands: BTreeMap<String, Raster>,
}

impl Scene {
    /// Create a scene whose bands are the raw bands named in `band_names`.
    pub fn new<I, S>(id: SceneId, properties: SceneProperties, band_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let bands = band_names
            .into_iter()
            .map(|name| {
                let raster = Raster::band(name);
                (raster.name().to_string(), raster)
            })
            .collect();
        Self {
            id,
            properties: Arc::new(properties),
            bands,
        }
    }

    pub fn id(&self) -> &SceneId {
        &self.id
    }

    pub fn properties(&self) -> &SceneProperties {
        &self.properties
    }

    pub fn footprint(&self) -> &Footprint {
        &self.properties.footprint
    }

    /// Select a band by name.
    pub fn select(&self, band: &str) -> Result<&Raster, SceneError> {
        self.bands.get(band).ok_or_else(|| SceneError::MissingBand {
            scene: self.id.clone(),
            band: band.to_string(),
        })
    }

    pub fn has_band(&self, band: &str) -> bool {
        self.bands.contains_key(band)
    }

    pub fn band_names(&self) -> impl Iterator<Item = &str> {
        self.bands.keys().map(String::as_str)
    }

    /// A new scene carrying `raster` under its name, replacing any band
    /// already bound to that name.
    pub fn with_band(&self, raster: Raster) -> Scene {
        let mut bands = self.bands.clone();
        bands.insert(raster.name().to_string(), raster);
        Scene {
            id: self.id.clone(),
            properties: Arc::clone(&self.properties),
            bands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::properties;

    #[test]
    fn test_select_existing_band() {
        let scene = Scene::new(
            SceneId::new("LC09_122044_20220915"),
            properties("2022-09-15", 10.0),
            ["ST_B10", "SR_B4"],
        );
        assert_eq!(scene.select("ST_B10").unwrap().name(), "ST_B10");
        assert!(scene.has_band("SR_B4"));
    }

    #[test]
    fn test_select_missing_band() {
        let scene = Scene::new(SceneId::new("a"), properties("2022-09-15", 10.0), ["ST_B10"]);
        let err = scene.select("ST_TRAD").unwrap_err();
        assert!(err.to_string().contains("ST_TRAD"));
    }

    #[test]
    fn test_with_band_is_functional_update() {
        let scene = Scene::new(SceneId::new("a"), properties("2022-09-15", 10.0), ["ST_B10"]);
        let lst = scene.select("ST_B10").unwrap().multiply(2.0).rename("LST");
        let derived = scene.with_band(lst);

        assert!(!scene.has_band("LST"));
        assert!(derived.has_band("LST"));
        assert!(derived.has_band("ST_B10"));
        assert_eq!(derived.id(), scene.id());
    }

    #[test]
    fn test_with_band_replaces_same_name() {
        let scene = Scene::new(SceneId::new("a"), properties("2022-09-15", 10.0), ["X"]);
        let replaced = scene.with_band(Raster::constant(1.0).rename("X"));
        assert_eq!(replaced.band_names().count(), 1);
        assert_ne!(replaced.select("X").unwrap(), scene.select("X").unwrap());
    }

    #[test]
    fn test_month() {
        assert_eq!(properties("2008-07-14", 0.0).month(), 7);
    }

    #[test]
    fn test_footprint_bounds_ring_is_closed() {
        let fp = Footprint::from_bounds(0.0, 0.0, 1.0, 1.0);
        assert_eq!(fp.coordinates.first(), fp.coordinates.last());
        assert!(!fp.is_empty());
    }
}
