//! Single-channel radiative transfer inversion.

use crate::raster::Raster;
use crate::sensor::PlanckConstants;

/// Surface-leaving blackbody radiance from at-sensor radiance.
///
/// ```text
/// Bt = (Trad - Urad - τ(1 - ε)·Drad) / (τ·ε)
/// ```
///
/// All inputs are calibrated radiance (W/(m²·sr·µm)) or unitless
/// transmittance and emissivity. A zero `τ·ε` yields no-data.
pub fn blackbody_radiance(
    thermal_radiance: &Raster,
    upwelling: &Raster,
    transmittance: &Raster,
    downwelling: &Raster,
    emissivity: &Raster,
) -> Raster {
    let reflected_sky = transmittance
        .multiply(&Raster::constant(1.0).subtract(emissivity))
        .multiply(downwelling);
    thermal_radiance
        .subtract(upwelling)
        .subtract(&reflected_sky)
        .divide(&transmittance.multiply(emissivity))
        .rename("BT")
}

/// Invert Planck's law: `K2 / ln(K1 / Bt + 1)`, in Kelvin.
pub fn invert_planck(radiance: &Raster, planck: PlanckConstants) -> Raster {
    let log_term = Raster::constant(planck.k1).divide(radiance).add(1.0).log();
    Raster::constant(planck.k2).divide(&log_term).rename("T")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{profile_for, SensorId};
    use crate::test_support::eval_point;

    fn bt_at(trad: f64, urad: f64, atran: f64, drad: f64, em: f64) -> f64 {
        let bt = blackbody_radiance(
            &Raster::band("T"),
            &Raster::band("U"),
            &Raster::band("A"),
            &Raster::band("D"),
            &Raster::band("E"),
        );
        eval_point(
            &bt,
            &[("T", trad), ("U", urad), ("A", atran), ("D", drad), ("E", em)],
        )
    }

    #[test]
    fn test_blackbody_radiance() {
        let bt = bt_at(10.0, 1.0, 0.9, 3.0, 0.987);
        assert!((bt - 10.092198581560284).abs() < 1e-9);
    }

    #[test]
    fn test_zero_transmittance_is_nodata() {
        assert!(bt_at(10.0, 1.0, 0.0, 3.0, 0.987).is_nan());
        assert!(bt_at(10.0, 1.0, 0.9, 3.0, 0.0).is_nan());
    }

    #[test]
    fn test_invert_planck() {
        let planck = profile_for(SensorId::Landsat9).planck;
        let kelvin = eval_point(
            &invert_planck(&Raster::band("B"), planck),
            &[("B", 10.092198581560284)],
        );
        assert!((kelvin - 303.4246).abs() < 1e-3);
    }

    #[test]
    fn test_non_positive_radiance_is_nodata() {
        let planck = profile_for(SensorId::Landsat8).planck;
        let t = invert_planck(&Raster::band("B"), planck);
        assert!(eval_point(&t, &[("B", 0.0)]).is_nan());
        // ln(K1 / -K1 + 1) = ln(0)
        assert!(eval_point(&t, &[("B", -planck.k1)]).is_nan());
    }
}
