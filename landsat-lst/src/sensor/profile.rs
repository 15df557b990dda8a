//! Static per-sensor constants.

use super::SensorId;

/// Scale factor for the Collection 2 surface temperature band (DN to Kelvin).
pub const THERMAL_SCALE: f64 = 0.00341802;

/// Offset for the Collection 2 surface temperature band, in Kelvin.
pub const THERMAL_OFFSET: f64 = 149.0;

/// Scale factor for Collection 2 surface reflectance bands.
pub const REFLECTANCE_SCALE: f64 = 0.0000275;

/// Offset for Collection 2 surface reflectance bands.
pub const REFLECTANCE_OFFSET: f64 = -0.2;

/// Planck calibration constants of a thermal band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanckConstants {
    /// K1 in W/(m²·sr·µm).
    pub k1: f64,
    /// K2 in Kelvin.
    pub k2: f64,
}

/// Names and scale factors of the atmospheric auxiliary bands.
///
/// These are identical across every Collection 2 Level-2 product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphericCalibration {
    pub thermal_radiance_band: &'static str,
    pub thermal_radiance_scale: f64,
    pub upwelling_band: &'static str,
    pub upwelling_scale: f64,
    pub transmittance_band: &'static str,
    pub transmittance_scale: f64,
    pub downwelling_band: &'static str,
    pub downwelling_scale: f64,
}

/// Atmospheric band calibration shared by all sensors.
pub const ATMOSPHERE: AtmosphericCalibration = AtmosphericCalibration {
    thermal_radiance_band: "ST_TRAD",
    thermal_radiance_scale: 0.001,
    upwelling_band: "ST_URAD",
    upwelling_scale: 0.001,
    transmittance_band: "ST_ATRAN",
    transmittance_scale: 0.0001,
    downwelling_band: "ST_DRAD",
    downwelling_scale: 0.001,
};

/// Immutable description of one sensor generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorProfile {
    pub sensor: SensorId,
    /// Catalog collection holding the Level-2 Tier 1 scenes.
    pub collection_id: &'static str,
    pub thermal_band: &'static str,
    pub red_band: &'static str,
    pub nir_band: &'static str,
    /// Red, green and blue reflectance bands for true-color display.
    pub true_color_bands: [&'static str; 3],
    pub thermal_scale: f64,
    pub thermal_offset: f64,
    pub reflectance_scale: f64,
    pub reflectance_offset: f64,
    pub planck: PlanckConstants,
    /// Whether the radiative-transfer inversion (LST2) is produced.
    pub supports_dual_method: bool,
}

// TM constants are kept for completeness; the TM profile stays
// direct-method only.
static LANDSAT5: SensorProfile = SensorProfile {
    sensor: SensorId::Landsat5,
    collection_id: "LANDSAT/LT05/C02/T1_L2",
    thermal_band: "ST_B6",
    red_band: "SR_B3",
    nir_band: "SR_B4",
    true_color_bands: ["SR_B3", "SR_B2", "SR_B1"],
    thermal_scale: THERMAL_SCALE,
    thermal_offset: THERMAL_OFFSET,
    reflectance_scale: REFLECTANCE_SCALE,
    reflectance_offset: REFLECTANCE_OFFSET,
    planck: PlanckConstants {
        k1: 607.76,
        k2: 1260.56,
    },
    supports_dual_method: false,
};

static LANDSAT7: SensorProfile = SensorProfile {
    sensor: SensorId::Landsat7,
    collection_id: "LANDSAT/LE07/C02/T1_L2",
    thermal_band: "ST_B6",
    red_band: "SR_B3",
    nir_band: "SR_B4",
    true_color_bands: ["SR_B3", "SR_B2", "SR_B1"],
    thermal_scale: THERMAL_SCALE,
    thermal_offset: THERMAL_OFFSET,
    reflectance_scale: REFLECTANCE_SCALE,
    reflectance_offset: REFLECTANCE_OFFSET,
    planck: PlanckConstants {
        k1: 666.09,
        k2: 1282.71,
    },
    supports_dual_method: true,
};

static LANDSAT8: SensorProfile = SensorProfile {
    sensor: SensorId::Landsat8,
    collection_id: "LANDSAT/LC08/C02/T1_L2",
    thermal_band: "ST_B10",
    red_band: "SR_B4",
    nir_band: "SR_B5",
    true_color_bands: ["SR_B4", "SR_B3", "SR_B2"],
    thermal_scale: THERMAL_SCALE,
    thermal_offset: THERMAL_OFFSET,
    reflectance_scale: REFLECTANCE_SCALE,
    reflectance_offset: REFLECTANCE_OFFSET,
    planck: PlanckConstants {
        k1: 774.89,
        k2: 1321.08,
    },
    supports_dual_method: true,
};

static LANDSAT9: SensorProfile = SensorProfile {
    sensor: SensorId::Landsat9,
    collection_id: "LANDSAT/LC09/C02/T1_L2",
    thermal_band: "ST_B10",
    red_band: "SR_B4",
    nir_band: "SR_B5",
    true_color_bands: ["SR_B4", "SR_B3", "SR_B2"],
    thermal_scale: THERMAL_SCALE,
    thermal_offset: THERMAL_OFFSET,
    reflectance_scale: REFLECTANCE_SCALE,
    reflectance_offset: REFLECTANCE_OFFSET,
    planck: PlanckConstants {
        k1: 774.89,
        k2: 1321.08,
    },
    supports_dual_method: true,
};

/// Look up the profile of a sensor.
pub fn profile_for(sensor: SensorId) -> &'static SensorProfile {
    match sensor {
        SensorId::Landsat5 => &LANDSAT5,
        SensorId::Landsat7 => &LANDSAT7,
        SensorId::Landsat8 => &LANDSAT8,
        SensorId::Landsat9 => &LANDSAT9,
    }
}

impl SensorProfile {
    /// Names of every raw band the full retrieval reads for this sensor.
    pub fn required_bands(&self) -> Vec<&'static str> {
        let mut bands = vec![self.thermal_band, self.red_band, self.nir_band];
        if self.supports_dual_method {
            bands.extend([
                ATMOSPHERE.thermal_radiance_band,
                ATMOSPHERE.upwelling_band,
                ATMOSPHERE.transmittance_band,
                ATMOSPHERE.downwelling_band,
            ]);
        }
        bands
    }
}
