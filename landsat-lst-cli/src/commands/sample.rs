//! Sample command - point retrieval from raw pixel values.
//!
//! Builds the same expression graphs the run command exports and evaluates
//! them on single-pixel bands.

use std::collections::HashMap;

use landsat_lst::emissivity::derive_emissivity;
use landsat_lst::lst::{LstEngine, TemperatureUnit};
use landsat_lst::raster::{evaluate, BandGrid, Raster};
use landsat_lst::scene::{Footprint, Scene, SceneId, SceneProperties};
use landsat_lst::sensor::{SensorId, SensorProfile, ATMOSPHERE};

use super::common::{SensorArg, UnitArg};
use crate::error::CliError;

/// Raw digital numbers of one pixel.
#[derive(Debug, Clone, Copy)]
pub struct SampleArgs {
    pub sensor: SensorArg,
    pub thermal: f64,
    pub red: f64,
    pub nir: f64,
    pub trad: Option<f64>,
    pub urad: Option<f64>,
    pub atran: Option<f64>,
    pub drad: Option<f64>,
    pub unit: UnitArg,
}

/// Values retrieved for one pixel.
#[derive(Debug, Clone, PartialEq)]
struct PointRetrieval {
    ndvi: f64,
    pv: f64,
    emissivity: f64,
    lst: f64,
    lst2: Option<f64>,
}

/// Run the sample command.
pub fn run(args: SampleArgs) -> Result<(), CliError> {
    let sensor = SensorId::from(args.sensor);
    let unit = TemperatureUnit::from(args.unit);
    let retrieval = retrieve(&args)?;

    println!("Sensor:     {}", sensor);
    println!("NDVI:       {:.4}", retrieval.ndvi);
    println!("Pv:         {:.4}", retrieval.pv);
    println!("Emissivity: {:.4}", retrieval.emissivity);
    println!("LST:        {:.4} {}", retrieval.lst, unit.symbol());
    match retrieval.lst2 {
        Some(lst2) => println!("LST2:       {:.4} {}", lst2, unit.symbol()),
        None if sensor.profile().supports_dual_method => {
            println!("LST2:       (needs --trad, --urad, --atran and --drad)")
        }
        None => println!("LST2:       (not produced for {})", sensor),
    }
    Ok(())
}

fn retrieve(args: &SampleArgs) -> Result<PointRetrieval, CliError> {
    let profile = SensorId::from(args.sensor).profile();
    let engine = LstEngine::new(args.unit.into());

    let mut pixels = HashMap::from([
        (profile.thermal_band.to_string(), BandGrid::single(args.thermal)),
        (profile.red_band.to_string(), BandGrid::single(args.red)),
        (profile.nir_band.to_string(), BandGrid::single(args.nir)),
    ]);
    let atmosphere = [
        (ATMOSPHERE.thermal_radiance_band, args.trad),
        (ATMOSPHERE.upwelling_band, args.urad),
        (ATMOSPHERE.transmittance_band, args.atran),
        (ATMOSPHERE.downwelling_band, args.drad),
    ];
    let has_atmosphere = atmosphere.iter().all(|(_, value)| value.is_some());
    if has_atmosphere {
        for (band, value) in atmosphere {
            if let Some(value) = value {
                pixels.insert(band.to_string(), BandGrid::single(value));
            }
        }
    }

    let scene = point_scene(profile, pixels.keys().cloned());
    let bands = derive_emissivity(&scene, profile)?;
    let lst = engine.direct(&scene, profile)?;
    let lst2 = if profile.supports_dual_method && has_atmosphere {
        Some(engine.radiative_transfer(&scene, profile)?)
    } else {
        None
    };

    let value = |raster: &Raster| -> Result<f64, CliError> {
        Ok(evaluate(raster, &pixels)?.data()[0])
    };
    Ok(PointRetrieval {
        ndvi: value(&bands.ndvi)?,
        pv: value(&bands.pv)?,
        emissivity: value(&bands.emissivity)?,
        lst: value(&lst)?,
        lst2: lst2.as_ref().map(value).transpose()?,
    })
}

fn point_scene(profile: &SensorProfile, bands: impl Iterator<Item = String>) -> Scene {
    let properties = SceneProperties {
        acquired: chrono::Local::now().date_naive(),
        path: 0,
        row: 0,
        cloud_cover: 0.0,
        footprint: Footprint::default(),
    };
    Scene::new(
        SceneId::new(format!("{}_POINT", profile.sensor.product_prefix())),
        properties,
        bands,
    )
}
