//! Display layer registration.
//!
//! Layers are named after the scene's product identifier, which is only
//! available through an asynchronous lookup. Registration awaits every
//! lookup before adding layers; a scene whose lookup fails is skipped and
//! the others are still registered.
//!
//! Per scene, in order:
//!
//! - `RGB_{product_id}` true color composite, `[0, 65535]`, gamma 2.0
//! - `LST_{product_id}` direct estimate, `[20, 40] °C`
//! - `LST2_{product_id}` radiative-transfer estimate, same stretch

use futures::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::catalog::{NameResolver, NamingError};
use crate::lst::{DerivedProduct, TemperatureUnit, KELVIN_OFFSET};
use crate::raster::Raster;
use crate::scene::SceneId;
use crate::sensor::SensorProfile;

/// Color ramp of the temperature layers, cold to hot.
pub const TEMPERATURE_PALETTE: [&str; 5] = ["blue", "limegreen", "yellow", "darkorange", "red"];

/// Display stretch of the temperature layers, in °C.
pub const TEMPERATURE_RANGE: (f64, f64) = (20.0, 40.0);

/// Display stretch of the true color layer, in raw DN.
pub const TRUE_COLOR_RANGE: (f64, f64) = (0.0, 65535.0);

pub const TRUE_COLOR_GAMMA: f64 = 2.0;

/// Rendering parameters of a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct VisParams {
    pub min: f64,
    pub max: f64,
    pub gamma: Option<f64>,
    pub palette: Vec<&'static str>,
}

impl VisParams {
    pub fn true_color() -> Self {
        Self {
            min: TRUE_COLOR_RANGE.0,
            max: TRUE_COLOR_RANGE.1,
            gamma: Some(TRUE_COLOR_GAMMA),
            palette: Vec::new(),
        }
    }

    /// Temperature stretch expressed in `unit`.
    pub fn temperature(unit: TemperatureUnit) -> Self {
        let shift = match unit {
            TemperatureUnit::Celsius => 0.0,
            TemperatureUnit::Kelvin => KELVIN_OFFSET,
        };
        Self {
            min: TEMPERATURE_RANGE.0 + shift,
            max: TEMPERATURE_RANGE.1 + shift,
            gamma: None,
            palette: TEMPERATURE_PALETTE.to_vec(),
        }
    }
}

/// A named display layer over one or three bands.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub bands: Vec<Raster>,
    pub params: VisParams,
}

/// Receives display layers.
pub trait LayerSink: Send + Sync {
    fn add_layer(&self, layer: Layer);
}

/// Collects layers in registration order.
#[derive(Debug, Default)]
pub struct LayerList {
    layers: Mutex<Vec<Layer>>,
}

impl LayerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> Vec<Layer> {
        self.layers.lock().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.layers.lock().iter().map(|l| l.name.clone()).collect()
    }
}

impl LayerSink for LayerList {
    fn add_layer(&self, layer: Layer) {
        self.layers.lock().push(layer);
    }
}

/// Outcome of [`Visualizer::register`].
#[derive(Debug, Default)]
pub struct VizReport {
    pub layers: usize,
    pub skipped: Vec<(SceneId, NamingError)>,
}

/// Registers display layers for derived products.
pub struct Visualizer<'a, R: NameResolver, L: LayerSink> {
    resolver: &'a R,
    sink: &'a L,
    unit: TemperatureUnit,
}

impl<'a, R: NameResolver, L: LayerSink> Visualizer<'a, R, L> {
    pub fn new(resolver: &'a R, sink: &'a L, unit: TemperatureUnit) -> Self {
        Self {
            resolver,
            sink,
            unit,
        }
    }

    /// Resolve every product's name, then add its layers.
    pub async fn register(&self, products: &[DerivedProduct], profile: &SensorProfile) -> VizReport {
        let names = join_all(
            products
                .iter()
                .map(|product| self.resolver.resolve_product_id(product.scene.id())),
        )
        .await;

        let mut report = VizReport::default();
        for (product, name) in products.iter().zip(names) {
            let name = match name {
                Ok(name) => name,
                Err(error) => {
                    warn!(scene = %product.scene.id(), error = %error, "Skipping display layers");
                    report.skipped.push((product.scene.id().clone(), error));
                    continue;
                }
            };
            for layer in self.layers_for(product, profile, &name) {
                debug!(layer = %layer.name, "Adding display layer");
                self.sink.add_layer(layer);
                report.layers += 1;
            }
        }
        report
    }

    fn layers_for(&self, product: &DerivedProduct, profile: &SensorProfile, name: &str) -> Vec<Layer> {
        let mut layers = Vec::with_capacity(3);

        let true_color: Option<Vec<Raster>> = profile
            .true_color_bands
            .iter()
            .map(|band| product.scene.select(band).ok().cloned())
            .collect();
        match true_color {
            Some(bands) => layers.push(Layer {
                name: format!("RGB_{name}"),
                bands,
                params: VisParams::true_color(),
            }),
            None => debug!(scene = %product.scene.id(), "No true color bands, skipping RGB layer"),
        }

        for raster in product.bands() {
            layers.push(Layer {
                name: format!("{}_{name}", raster.name()),
                bands: vec![raster.clone()],
                params: VisParams::temperature(self.unit),
            });
        }
        layers
    }
}
