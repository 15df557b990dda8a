//! Vegetation fraction and land surface emissivity.
//!
//! Emissivity follows the NDVI threshold method:
//!
//! ```text
//! NDVI = (NIR - Red) / (NIR + Red)
//! Pv   = (NDVI - NDVI_soil) / (NDVI_veg - NDVI_soil)     NDVI_soil = 0.05, NDVI_veg = 0.70
//!        1 where NDVI > NDVI_veg, 0 where NDVI < NDVI_soil, clamped to [0, 1]
//! ε    = 0.004 · Pv + 0.986
//! ```
//!
//! Reflectance is calibrated from raw DNs with the profile's scale and
//! offset first. Pixels where `NIR + Red` is zero come out as no-data and
//! stay no-data through Pv and ε.

use crate::raster::Raster;
use crate::scene::{Scene, SceneError};
use crate::sensor::SensorProfile;

/// NDVI of bare soil.
pub const NDVI_SOIL: f64 = 0.05;

/// NDVI of full vegetation cover.
pub const NDVI_VEGETATION: f64 = 0.70;

/// Emissivity of bare soil (Pv = 0).
pub const EMISSIVITY_SOIL: f64 = 0.986;

/// Emissivity gain from soil to full cover.
pub const EMISSIVITY_VEGETATION_GAIN: f64 = 0.004;

/// `1 / NDVI_SOIL`.
const PV_NDVI_GAIN: f64 = 20.0;

/// `(NDVI_VEGETATION - NDVI_SOIL) / NDVI_SOIL`.
const PV_DIVISOR: f64 = 13.0;

/// Rasters produced by [`derive_emissivity`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmissivityBands {
    pub ndvi: Raster,
    pub pv: Raster,
    pub emissivity: Raster,
}

/// Calibrate a raw reflectance band.
pub fn calibrate_reflectance(raw: &Raster, profile: &SensorProfile) -> Raster {
    raw.multiply(profile.reflectance_scale)
        .add(profile.reflectance_offset)
}

/// NDVI from calibrated NIR and red reflectance.
pub fn ndvi(nir: &Raster, red: &Raster) -> Raster {
    nir.subtract(red).divide(&nir.add(red)).rename("NDVI")
}

/// Fractional vegetation cover from NDVI.
///
/// `(NDVI - 0.05) / 0.65` is evaluated as `(20·NDVI - 1) / 13`. Both
/// thresholds then map to exactly 0 and 1 and the midpoint 0.375 to
/// exactly 0.5.
pub fn vegetation_fraction(ndvi: &Raster) -> Raster {
    ndvi.multiply(PV_NDVI_GAIN)
        .subtract(1.0)
        .divide(PV_DIVISOR)
        .where_(&ndvi.gt(NDVI_VEGETATION), 1.0)
        .where_(&ndvi.lt(NDVI_SOIL), 0.0)
        .clamp(0.0, 1.0)
        .rename("PV")
}

/// Emissivity from vegetation fraction.
pub fn emissivity(pv: &Raster) -> Raster {
    pv.multiply(EMISSIVITY_VEGETATION_GAIN)
        .add(EMISSIVITY_SOIL)
        .rename("EM")
}

/// Derive NDVI, Pv and emissivity for a scene.
pub fn derive_emissivity(
    scene: &Scene,
    profile: &SensorProfile,
) -> Result<EmissivityBands, SceneError> {
    let red = calibrate_reflectance(scene.select(profile.red_band)?, profile);
    let nir = calibrate_reflectance(scene.select(profile.nir_band)?, profile);

    let ndvi = ndvi(&nir, &red);
    let pv = vegetation_fraction(&ndvi);
    let emissivity = emissivity(&pv);

    Ok(EmissivityBands {
        ndvi,
        pv,
        emissivity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneId;
    use crate::sensor::{profile_for, SensorId};
    use crate::test_support::{eval_point, properties};
    use proptest::prelude::*;

    fn pv_at(value: f64) -> f64 {
        eval_point(&vegetation_fraction(&Raster::band("N")), &[("N", value)])
    }

    fn em_at(pv: f64) -> f64 {
        eval_point(&emissivity(&Raster::band("P")), &[("P", pv)])
    }

    /// Raw DN that calibrates to `reflectance`.
    fn dn(reflectance: f64) -> f64 {
        (reflectance + 0.2) / 0.0000275
    }

    #[test]
    fn test_pv_thresholds() {
        assert_eq!(pv_at(0.70), 1.0);
        assert_eq!(pv_at(0.85), 1.0);
        assert_eq!(pv_at(1.0), 1.0);
        assert_eq!(pv_at(0.05), 0.0);
        assert_eq!(pv_at(0.0), 0.0);
        assert_eq!(pv_at(-0.6), 0.0);
    }

    #[test]
    fn test_pv_midpoint_is_exact() {
        assert_eq!(pv_at(0.375), 0.5);
    }

    #[test]
    fn test_pv_linear_between_thresholds() {
        assert!((pv_at(0.18) - 0.2).abs() < 1e-12);
        assert!((pv_at(0.57) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_emissivity_endpoints() {
        assert!((em_at(0.0) - 0.986).abs() < 1e-12);
        assert!((em_at(1.0) - 0.990).abs() < 1e-12);
    }

    #[test]
    fn test_undefined_ndvi_propagates() {
        let red = Raster::band("R");
        let nir = Raster::band("N");
        let em = emissivity(&vegetation_fraction(&ndvi(&nir, &red)));
        let value = eval_point(&em, &[("R", 0.0), ("N", 0.0)]);
        assert!(value.is_nan());
    }

    #[test]
    fn test_derive_from_raw_reflectance() {
        let profile = profile_for(SensorId::Landsat8);
        let scene = Scene::new(
            SceneId::new("s"),
            properties("2022-09-15", 5.0),
            ["SR_B4", "SR_B5"],
        );
        let bands = derive_emissivity(&scene, profile).unwrap();
        assert_eq!(bands.ndvi.name(), "NDVI");
        assert_eq!(bands.pv.name(), "PV");
        assert_eq!(bands.emissivity.name(), "EM");

        // red 0.1, nir 0.3 -> NDVI 0.5
        let pixels = [("SR_B4", dn(0.1)), ("SR_B5", dn(0.3))];
        let ndvi = eval_point(&bands.ndvi, &pixels);
        assert!((ndvi - 0.5).abs() < 1e-9);
        let expected_pv = (0.5 - 0.05) / 0.65;
        assert!((eval_point(&bands.pv, &pixels) - expected_pv).abs() < 1e-9);
        let expected_em = 0.004 * expected_pv + 0.986;
        assert!((eval_point(&bands.emissivity, &pixels) - expected_em).abs() < 1e-9);
    }

    #[test]
    fn test_derive_requires_reflectance_bands() {
        let profile = profile_for(SensorId::Landsat5);
        let scene = Scene::new(SceneId::new("s"), properties("2008-07-14", 5.0), ["ST_B6"]);
        let err = derive_emissivity(&scene, profile).unwrap_err();
        assert!(err.to_string().contains("SR_B3"));
    }

    proptest! {
        #[test]
        fn prop_pv_in_unit_interval(ndvi in -1.0f64..=1.0) {
            let pv = pv_at(ndvi);
            prop_assert!((0.0..=1.0).contains(&pv));
        }

        #[test]
        fn prop_emissivity_in_range(pv in 0.0f64..=1.0) {
            let em = em_at(pv);
            prop_assert!((0.986 - 1e-12..=0.990 + 1e-12).contains(&em));
        }

        #[test]
        fn prop_pv_idempotent_after_override(ndvi in -1.0f64..=1.0) {
            // NDVI pinned to the threshold interval gives the same Pv.
            let pinned = ndvi.clamp(NDVI_SOIL, NDVI_VEGETATION);
            prop_assert_eq!(pv_at(ndvi), pv_at(pinned));
        }
    }
}
