//! Common types and utilities shared across CLI commands.

use std::time::Duration;

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use landsat_lst::lst::TemperatureUnit;
use landsat_lst::sensor::SensorId;

/// Sensor selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum SensorArg {
    /// Landsat 5 TM
    L5,
    /// Landsat 7 ETM+
    L7,
    /// Landsat 8 OLI/TIRS
    L8,
    /// Landsat 9 OLI-2/TIRS-2
    L9,
}

impl From<SensorArg> for SensorId {
    fn from(arg: SensorArg) -> Self {
        match arg {
            SensorArg::L5 => SensorId::Landsat5,
            SensorArg::L7 => SensorId::Landsat7,
            SensorArg::L8 => SensorId::Landsat8,
            SensorArg::L9 => SensorId::Landsat9,
        }
    }
}

/// Output temperature unit for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum UnitArg {
    Celsius,
    Kelvin,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Celsius => TemperatureUnit::Celsius,
            UnitArg::Kelvin => TemperatureUnit::Kelvin,
        }
    }
}

/// Spinner for a step of unknown length.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
