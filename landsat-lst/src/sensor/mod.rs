//! Sensor profile table.
//!
//! Every sensor-specific constant the retrieval needs (band names, scale
//! factors, Planck constants, collection identifiers) lives here as data.
//! The engine never branches on the sensor itself; it asks for a
//! [`SensorProfile`] and reads the fields.
//!
//! # Example
//!
//! ```
//! use landsat_lst::sensor::{profile_for, SensorId};
//!
//! let profile = profile_for(SensorId::Landsat9);
//! assert_eq!(profile.thermal_band, "ST_B10");
//! assert!(profile.supports_dual_method);
//! ```

mod profile;

pub use profile::{
    profile_for, AtmosphericCalibration, PlanckConstants, SensorProfile, ATMOSPHERE,
    REFLECTANCE_OFFSET, REFLECTANCE_SCALE, THERMAL_OFFSET, THERMAL_SCALE,
};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Landsat sensor generations supported by the retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorId {
    /// Landsat 5 Thematic Mapper.
    Landsat5,
    /// Landsat 7 Enhanced Thematic Mapper Plus.
    Landsat7,
    /// Landsat 8 OLI/TIRS.
    Landsat8,
    /// Landsat 9 OLI-2/TIRS-2.
    Landsat9,
}

/// Error returned when a sensor name cannot be recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sensor '{0}' (expected one of l5, l7, l8, l9)")]
pub struct UnknownSensor(pub String);

impl SensorId {
    /// All sensors, oldest first.
    pub const ALL: [SensorId; 4] = [
        SensorId::Landsat5,
        SensorId::Landsat7,
        SensorId::Landsat8,
        SensorId::Landsat9,
    ];

    /// Short lowercase key used in config files and CLI flags.
    pub fn key(&self) -> &'static str {
        match self {
            SensorId::Landsat5 => "l5",
            SensorId::Landsat7 => "l7",
            SensorId::Landsat8 => "l8",
            SensorId::Landsat9 => "l9",
        }
    }

    /// Four-character mission code that prefixes Collection 2 product IDs.
    pub fn product_prefix(&self) -> &'static str {
        match self {
            SensorId::Landsat5 => "LT05",
            SensorId::Landsat7 => "LE07",
            SensorId::Landsat8 => "LC08",
            SensorId::Landsat9 => "LC09",
        }
    }

    /// Resolve a sensor from a product ID prefix such as `LC09`.
    pub fn from_product_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.product_prefix().eq_ignore_ascii_case(prefix))
    }

    /// Returns the profile for this sensor.
    pub fn profile(&self) -> &'static SensorProfile {
        profile_for(*self)
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorId::Landsat5 => "Landsat 5 TM",
            SensorId::Landsat7 => "Landsat 7 ETM+",
            SensorId::Landsat8 => "Landsat 8 TIRS",
            SensorId::Landsat9 => "Landsat 9 TIRS",
        };
        f.write_str(name)
    }
}

impl FromStr for SensorId {
    type Err = UnknownSensor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "l5" | "landsat5" | "lt05" | "tm" => Ok(SensorId::Landsat5),
            "l7" | "landsat7" | "le07" | "etm" | "etm+" => Ok(SensorId::Landsat7),
            "l8" | "landsat8" | "lc08" => Ok(SensorId::Landsat8),
            "l9" | "landsat9" | "lc09" => Ok(SensorId::Landsat9),
            _ => Err(UnknownSensor(s.to_string())),
        }
    }
}
