//! Land surface temperature retrieval.
//!
//! Two estimates are produced per scene:
//!
//! ```text
//!                      ┌─────────────────────────────┐
//!  thermal DN ───────► │ DN·scale + offset           │ ──► LST   (direct)
//!                      └─────────────────────────────┘
//!  red, NIR ─► emissivity ─┐
//!  TRAD, URAD,             │   ┌─────────────────────┐
//!  ATRAN, DRAD ────────────┴─► │ Bt ─► Planck⁻¹(K1,K2)│ ──► LST2  (radiative transfer)
//!                              └─────────────────────┘
//! ```
//!
//! The direct estimate is always computed. The radiative-transfer estimate
//! is computed only for sensors whose profile supports it. Results are
//! attached to the scene as new `LST`/`LST2` bands; the input bands are
//! kept.
//!
//! # Example
//!
//! ```ignore
//! use landsat_lst::lst::{LstEngine, TemperatureUnit};
//!
//! let engine = LstEngine::new(TemperatureUnit::Celsius);
//! let product = engine.compute(scene, profile)?;
//! assert!(product.lst2.is_some());
//! ```

mod planck;

pub use planck::{blackbody_radiance, invert_planck};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::emissivity::derive_emissivity;
use crate::raster::Raster;
use crate::scene::{Scene, SceneError};
use crate::sensor::{SensorProfile, ATMOSPHERE};

/// Name of the direct-method output band.
pub const LST_BAND: &str = "LST";

/// Name of the radiative-transfer output band.
pub const LST2_BAND: &str = "LST2";

/// Offset between Kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Unit of the produced temperature bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Kelvin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown temperature unit '{0}' (expected celsius or kelvin)")]
pub struct UnknownUnit(pub String);

impl TemperatureUnit {
    /// Convert a Kelvin raster to this unit.
    fn convert_kelvin(self, kelvin: Raster) -> Raster {
        match self {
            TemperatureUnit::Celsius => kelvin.subtract(KELVIN_OFFSET),
            TemperatureUnit::Kelvin => kelvin,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "celsius"),
            TemperatureUnit::Kelvin => write!(f, "kelvin"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "kelvin" | "k" => Ok(TemperatureUnit::Kelvin),
            _ => Err(UnknownUnit(s.to_string())),
        }
    }
}

/// A scene carrying its derived temperature bands.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedProduct {
    /// The input scene with `LST` (and `LST2`) added.
    pub scene: Scene,
    pub lst: Raster,
    pub lst2: Option<Raster>,
}

impl DerivedProduct {
    /// Derived bands in export order.
    pub fn bands(&self) -> Vec<&Raster> {
        std::iter::once(&self.lst).chain(self.lst2.as_ref()).collect()
    }
}

/// Per-scene LST computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LstEngine {
    unit: TemperatureUnit,
}

impl LstEngine {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Direct conversion of the Level-2 surface temperature band.
    pub fn direct(&self, scene: &Scene, profile: &SensorProfile) -> Result<Raster, SceneError> {
        let kelvin = scene
            .select(profile.thermal_band)?
            .multiply(profile.thermal_scale)
            .add(profile.thermal_offset);
        Ok(self.unit.convert_kelvin(kelvin).rename(LST_BAND))
    }

    /// Single-channel radiative-transfer inversion.
    pub fn radiative_transfer(
        &self,
        scene: &Scene,
        profile: &SensorProfile,
    ) -> Result<Raster, SceneError> {
        let emissivity = derive_emissivity(scene, profile)?.emissivity;

        let calibrated = |band: &str, scale: f64| -> Result<Raster, SceneError> {
            Ok(scene.select(band)?.multiply(scale))
        };
        let thermal_radiance = calibrated(
            ATMOSPHERE.thermal_radiance_band,
            ATMOSPHERE.thermal_radiance_scale,
        )?;
        let upwelling = calibrated(ATMOSPHERE.upwelling_band, ATMOSPHERE.upwelling_scale)?;
        let transmittance = calibrated(
            ATMOSPHERE.transmittance_band,
            ATMOSPHERE.transmittance_scale,
        )?;
        let downwelling = calibrated(ATMOSPHERE.downwelling_band, ATMOSPHERE.downwelling_scale)?;

        let radiance = blackbody_radiance(
            &thermal_radiance,
            &upwelling,
            &transmittance,
            &downwelling,
            &emissivity,
        );
        let kelvin = invert_planck(&radiance, profile.planck);
        Ok(self.unit.convert_kelvin(kelvin).rename(LST2_BAND))
    }

    /// Compute every estimate the profile supports and attach it to the scene.
    pub fn compute(
        &self,
        scene: Scene,
        profile: &SensorProfile,
    ) -> Result<DerivedProduct, SceneError> {
        let lst = self.direct(&scene, profile)?;
        let lst2 = if profile.supports_dual_method {
            Some(self.radiative_transfer(&scene, profile)?)
        } else {
            None
        };

        let mut derived = scene.with_band(lst.clone());
        if let Some(lst2) = &lst2 {
            derived = derived.with_band(lst2.clone());
        }
        debug!(
            scene = %derived.id(),
            sensor = %profile.sensor,
            dual = lst2.is_some(),
            unit = %self.unit,
            "Derived LST bands"
        );

        Ok(DerivedProduct {
            scene: derived,
            lst,
            lst2,
        })
    }
}
