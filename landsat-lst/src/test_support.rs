//! Shared fixtures for unit tests.

use std::collections::HashMap;

use crate::catalog::CatalogRecord;
use crate::raster::{evaluate, BandGrid, Raster};
use crate::scene::{Footprint, SceneId, SceneProperties};
use crate::sensor::SensorId;

pub const L9: &str = "LANDSAT/LC09/C02/T1_L2";

pub fn properties(acquired: &str, cloud_cover: f64) -> SceneProperties {
    SceneProperties {
        acquired: acquired.parse().unwrap(),
        path: 122,
        row: 44,
        cloud_cover,
        footprint: Footprint::from_bounds(113.0, 22.0, 115.0, 24.0),
    }
}

/// A Landsat 9 record carrying every band the retrieval reads.
pub fn record(id: &str, acquired: &str, cloud_cover: f64) -> CatalogRecord {
    CatalogRecord {
        id: SceneId::new(id),
        collection: L9.to_string(),
        product_id: Some(format!("{id}_PRODUCT")),
        properties: properties(acquired, cloud_cover),
        bands: SensorId::Landsat9
            .profile()
            .required_bands()
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

/// Evaluate `raster` on single-pixel bands.
pub fn eval_point(raster: &Raster, pixels: &[(&str, f64)]) -> f64 {
    let bands: HashMap<String, BandGrid> = pixels
        .iter()
        .map(|(name, value)| (name.to_string(), BandGrid::single(*value)))
        .collect();
    evaluate(raster, &bands).unwrap().data()[0]
}
