//! Landsat LST - Land surface temperature retrieval for Landsat 5/7/8/9
//!
//! This library selects Level-2 scenes from a catalog, derives vegetation
//! fraction and emissivity from surface reflectance, computes land surface
//! temperature by the direct and the radiative-transfer method, and submits
//! the derived rasters for export.
//!
//! All raster work is expressed as lazy [`raster::Raster`] expressions; the
//! backend that finally evaluates them is external. [`raster::evaluate`] is a
//! local reference evaluator used for point retrievals and tests.
//!
//! ```ignore
//! use landsat_lst::catalog::MemoryCatalog;
//! use landsat_lst::export::ManifestSink;
//! use landsat_lst::pipeline::LstPipeline;
//! use landsat_lst::selector::SceneQuery;
//! use landsat_lst::sensor::SensorId;
//!
//! let query = SceneQuery::builder()
//!     .sensor(SensorId::Landsat9)
//!     .date_range(start, end)
//!     .path_row(122, 44)
//!     .build()?;
//! let sink = ManifestSink::new("exports");
//! let report = LstPipeline::new(&catalog, &sink).run(&query)?;
//! ```

pub mod catalog;
pub mod config;
pub mod emissivity;
pub mod export;
pub mod logging;
pub mod lst;
pub mod pipeline;
pub mod raster;
pub mod scene;
pub mod selector;
pub mod sensor;
pub mod viz;

#[cfg(test)]
mod test_support;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
