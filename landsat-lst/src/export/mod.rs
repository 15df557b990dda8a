//! Export dispatch.
//!
//! For every derived product the dispatcher resolves the scene's product
//! identifier and submits one export job per derived band:
//!
//! | Derived bands | Job descriptions |
//! |---------------|------------------|
//! | `LST`         | `{product_id}` |
//! | `LST`, `LST2` | `{product_id}_LST`, `{product_id}_LST2` |
//!
//! Submission is fire-and-forget. The dispatcher never waits on a job and
//! never retries one. A failed name lookup skips that scene; a failed
//! submission skips that band. Both are recorded in the
//! [`DispatchReport`] and the remaining work proceeds.
//!
//! # Example
//!
//! ```ignore
//! use landsat_lst::export::{ExportDispatcher, ExportParams, ManifestSink};
//!
//! let sink = ManifestSink::new("exports");
//! let report = ExportDispatcher::new(&catalog, &sink, ExportParams::default())
//!     .dispatch(&products);
//! println!("{} jobs submitted", report.submitted.len());
//! ```

mod sink;

pub use sink::{ExportSink, JobHandle, ManifestSink, RecordingSink};

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{NameResolver, NamingError};
use crate::lst::DerivedProduct;
use crate::raster::Raster;
use crate::scene::{Footprint, SceneId};

/// Default output resolution in meters.
pub const DEFAULT_SCALE_METERS: f64 = 30.0;

/// Default pixel budget of a single export.
pub const DEFAULT_MAX_PIXELS: u64 = 10_000_000_000_000;

/// Errors submitting an export job.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export job {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export job file {0} already exists")]
    AlreadyExists(PathBuf),

    #[error("Failed to serialize export job: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Export job '{0}' was rejected")]
    Rejected(String),
}

/// Parameters shared by every job of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportParams {
    pub scale_meters: f64,
    pub max_pixels: u64,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            scale_meters: DEFAULT_SCALE_METERS,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// One raster export request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportJob {
    pub raster: Raster,
    pub description: String,
    pub scale_meters: f64,
    pub region: Footprint,
    pub max_pixels: u64,
}

impl ExportJob {
    pub fn new(
        raster: Raster,
        description: impl Into<String>,
        region: Footprint,
        params: &ExportParams,
    ) -> Self {
        Self {
            raster,
            description: description.into(),
            scale_meters: params.scale_meters,
            region,
            max_pixels: params.max_pixels,
        }
    }
}

/// A job accepted by the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedJob {
    pub scene: SceneId,
    pub description: String,
    pub handle: JobHandle,
}

/// Work that could not be dispatched.
#[derive(Debug)]
pub enum DispatchFailure {
    /// The product identifier could not be resolved; no job was submitted
    /// for the scene.
    Naming { scene: SceneId, error: NamingError },
    /// The sink refused one job.
    Submission {
        scene: SceneId,
        description: String,
        error: ExportError,
    },
}

impl DispatchFailure {
    pub fn scene(&self) -> &SceneId {
        match self {
            DispatchFailure::Naming { scene, .. } | DispatchFailure::Submission { scene, .. } => {
                scene
            }
        }
    }
}

/// Outcome of [`ExportDispatcher::dispatch`].
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub submitted: Vec<SubmittedJob>,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Job descriptions for a product with `band_names`, in band order.
pub fn job_descriptions(product_id: &str, band_names: &[&str]) -> Vec<String> {
    match band_names {
        [_] => vec![product_id.to_string()],
        bands => bands
            .iter()
            .map(|band| format!("{product_id}_{band}"))
            .collect(),
    }
}

/// Submits export jobs for derived products.
pub struct ExportDispatcher<'a, R: NameResolver, S: ExportSink> {
    resolver: &'a R,
    sink: &'a S,
    params: ExportParams,
}

impl<'a, R: NameResolver, S: ExportSink> ExportDispatcher<'a, R, S> {
    pub fn new(resolver: &'a R, sink: &'a S, params: ExportParams) -> Self {
        Self {
            resolver,
            sink,
            params,
        }
    }

    /// Submit every derived band of every product.
    pub fn dispatch(&self, products: &[DerivedProduct]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for product in products {
            let scene = product.scene.id();
            let product_id = match self.resolver.product_id(scene) {
                Ok(id) => id,
                Err(error) => {
                    warn!(scene = %scene, error = %error, "Skipping export, product ID unavailable");
                    report.failures.push(DispatchFailure::Naming {
                        scene: scene.clone(),
                        error,
                    });
                    continue;
                }
            };

            let bands = product.bands();
            let names: Vec<&str> = bands.iter().map(|raster| raster.name()).collect();
            let descriptions = job_descriptions(&product_id, &names);

            for (raster, description) in bands.into_iter().zip(descriptions) {
                let job = ExportJob::new(
                    raster.clone(),
                    description.clone(),
                    product.scene.footprint().clone(),
                    &self.params,
                );
                match self.sink.submit(job) {
                    Ok(handle) => {
                        debug!(scene = %scene, description = %description, handle = %handle, "Export submitted");
                        report.submitted.push(SubmittedJob {
                            scene: scene.clone(),
                            description,
                            handle,
                        });
                    }
                    Err(error) => {
                        warn!(scene = %scene, description = %description, error = %error, "Export submission failed");
                        report.failures.push(DispatchFailure::Submission {
                            scene: scene.clone(),
                            description,
                            error,
                        });
                    }
                }
            }
        }

        info!(
            submitted = report.submitted.len(),
            failed = report.failures.len(),
            "Export dispatch finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::lst::LstEngine;
    use crate::scene::Scene;
    use crate::sensor::{profile_for, SensorId};
    use crate::test_support::{properties, record};

    fn product(id: &str, sensor: SensorId) -> DerivedProduct {
        let profile = profile_for(sensor);
        let scene = Scene::new(
            SceneId::new(id),
            properties("2022-09-15", 5.0),
            profile.required_bands(),
        );
        LstEngine::default().compute(scene, profile).unwrap()
    }

    fn catalog() -> MemoryCatalog {
        let mut missing = record("nameless", "2022-09-20", 5.0);
        missing.product_id = None;
        MemoryCatalog::landsat()
            .with_record(record("a", "2022-09-03", 5.0))
            .with_record(record("b", "2022-09-19", 5.0))
            .with_record(missing)
    }

    #[test]
    fn test_job_descriptions() {
        assert_eq!(job_descriptions("P", &["LST"]), vec!["P"]);
        assert_eq!(
            job_descriptions("P", &["LST", "LST2"]),
            vec!["P_LST", "P_LST2"]
        );
    }

    #[test]
    fn test_dual_method_names() {
        let catalog = catalog();
        let sink = RecordingSink::new();
        let products = [product("a", SensorId::Landsat9)];

        let report = ExportDispatcher::new(&catalog, &sink, ExportParams::default())
            .dispatch(&products);

        assert!(report.is_complete());
        assert_eq!(sink.descriptions(), vec!["a_PRODUCT_LST", "a_PRODUCT_LST2"]);
        let jobs = sink.jobs();
        assert_eq!(jobs[0].raster.name(), "LST");
        assert_eq!(jobs[1].raster.name(), "LST2");
        assert_eq!(jobs[0].scale_meters, 30.0);
        assert_eq!(jobs[0].max_pixels, DEFAULT_MAX_PIXELS);
        assert_eq!(&jobs[0].region, products[0].scene.footprint());
    }

    #[test]
    fn test_single_method_name() {
        let catalog = catalog();
        let sink = RecordingSink::new();
        let products = [product("a", SensorId::Landsat5)];

        ExportDispatcher::new(&catalog, &sink, ExportParams::default()).dispatch(&products);
        assert_eq!(sink.descriptions(), vec!["a_PRODUCT"]);
    }

    #[test]
    fn test_naming_failure_skips_only_that_scene() {
        let catalog = catalog();
        let sink = RecordingSink::new();
        let products = [
            product("a", SensorId::Landsat9),
            product("nameless", SensorId::Landsat9),
            product("b", SensorId::Landsat9),
        ];

        let report = ExportDispatcher::new(&catalog, &sink, ExportParams::default())
            .dispatch(&products);

        assert_eq!(report.submitted.len(), 4);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].scene().as_str(), "nameless");
        assert!(matches!(
            report.failures[0],
            DispatchFailure::Naming {
                error: NamingError::MissingProductId(_),
                ..
            }
        ));
        assert_eq!(
            sink.descriptions(),
            vec![
                "a_PRODUCT_LST",
                "a_PRODUCT_LST2",
                "b_PRODUCT_LST",
                "b_PRODUCT_LST2"
            ]
        );
    }

    #[test]
    fn test_submission_failure_continues() {
        let catalog = catalog();
        let sink = RecordingSink::new().reject("a_PRODUCT_LST");
        let products = [
            product("a", SensorId::Landsat9),
            product("b", SensorId::Landsat9),
        ];

        let report = ExportDispatcher::new(&catalog, &sink, ExportParams::default())
            .dispatch(&products);

        assert_eq!(report.submitted.len(), 3);
        assert!(matches!(
            &report.failures[..],
            [DispatchFailure::Submission { description, .. }] if description == "a_PRODUCT_LST"
        ));
    }

    #[test]
    fn test_manifest_collision_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let sink = ManifestSink::new(dir.path());
        let products = [
            product("a", SensorId::Landsat9),
            product("a", SensorId::Landsat9),
        ];

        let report = ExportDispatcher::new(&catalog, &sink, ExportParams::default())
            .dispatch(&products);

        assert_eq!(report.submitted.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|failure| matches!(
            failure,
            DispatchFailure::Submission {
                error: ExportError::AlreadyExists(_),
                ..
            }
        )));
        assert!(!report.is_complete());
    }

    #[test]
    fn test_custom_params() {
        let catalog = catalog();
        let sink = RecordingSink::new();
        let params = ExportParams {
            scale_meters: 100.0,
            max_pixels: 1_000,
        };
        ExportDispatcher::new(&catalog, &sink, params)
            .dispatch(&[product("b", SensorId::Landsat8)]);
        assert!(sink
            .jobs()
            .iter()
            .all(|job| job.scale_meters == 100.0 && job.max_pixels == 1_000));
    }

    #[test]
    fn test_one_name_lookup_per_scene() {
        let catalog = catalog();
        let sink = RecordingSink::new();
        let products = [
            product("a", SensorId::Landsat9),
            product("b", SensorId::Landsat9),
        ];
        ExportDispatcher::new(&catalog, &sink, ExportParams::default()).dispatch(&products);
        assert_eq!(catalog.name_calls(), 2);
    }
}
