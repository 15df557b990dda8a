//! Profiles command - print the sensor profile table.

use landsat_lst::sensor::{SensorId, ATMOSPHERE};

/// Run the profiles command.
pub fn run() {
    println!("Sensor Profiles");
    println!("===============");

    for sensor in SensorId::ALL {
        let profile = sensor.profile();
        println!();
        println!("[{}] {}", sensor.key(), sensor);
        println!("  collection     = {}", profile.collection_id);
        println!(
            "  thermal        = {} (DN × {} + {} K)",
            profile.thermal_band, profile.thermal_scale, profile.thermal_offset
        );
        println!(
            "  red / nir      = {} / {} (DN × {} + {})",
            profile.red_band,
            profile.nir_band,
            profile.reflectance_scale,
            profile.reflectance_offset
        );
        println!("  true color     = {}", profile.true_color_bands.join(", "));
        println!(
            "  planck         = K1 {} / K2 {}",
            profile.planck.k1, profile.planck.k2
        );
        println!(
            "  methods        = {}",
            if profile.supports_dual_method {
                "direct, radiative transfer"
            } else {
                "direct"
            }
        );
    }

    println!();
    println!("Atmospheric bands (all sensors):");
    println!(
        "  {} ×{}, {} ×{}, {} ×{}, {} ×{}",
        ATMOSPHERE.thermal_radiance_band,
        ATMOSPHERE.thermal_radiance_scale,
        ATMOSPHERE.upwelling_band,
        ATMOSPHERE.upwelling_scale,
        ATMOSPHERE.transmittance_band,
        ATMOSPHERE.transmittance_scale,
        ATMOSPHERE.downwelling_band,
        ATMOSPHERE.downwelling_scale
    );
}
