//! Landsat LST CLI - Command-line interface
//!
//! Selects Landsat Level-2 scenes, derives land surface temperature and
//! submits per-band export jobs.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::style;
use landsat_lst::catalog::MonthSet;
use landsat_lst::pipeline::PipelineError;

use commands::common::{SensorArg, UnitArg};
use commands::config::ConfigCommands;
use commands::run::RunArgs;
use commands::sample::SampleArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "landsat-lst")]
#[command(about = "Land surface temperature from Landsat Collection 2 Level-2 scenes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select scenes, derive LST and submit export jobs
    Run {
        /// Scene catalog manifest (JSON)
        #[arg(long)]
        catalog: PathBuf,

        /// Sensor generation
        #[arg(long, value_enum)]
        sensor: Option<SensorArg>,

        /// First acquisition date (inclusive, YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last acquisition date (exclusive, YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// WRS-2 path
        #[arg(long)]
        path: Option<u16>,

        /// WRS-2 row
        #[arg(long)]
        row: Option<u16>,

        /// Only keep these months (e.g., 5,6,7)
        #[arg(long)]
        include_months: Option<MonthSet>,

        /// Drop these months (ignored when --include-months is set)
        #[arg(long)]
        exclude_months: Option<MonthSet>,

        /// Minimum cloud cover percentage
        #[arg(long)]
        cloud_min: Option<f64>,

        /// Maximum cloud cover percentage
        #[arg(long)]
        cloud_max: Option<f64>,

        /// Output temperature unit
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,

        /// Directory for export job manifests
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export resolution in meters
        #[arg(long)]
        scale: Option<f64>,

        /// Also register display layers and list them
        #[arg(long)]
        layers: bool,

        /// Enable debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Retrieve NDVI, emissivity and LST for one pixel from raw DNs
    Sample {
        /// Sensor generation
        #[arg(long, value_enum, default_value = "l9")]
        sensor: SensorArg,

        /// Surface temperature band DN
        #[arg(long)]
        thermal: f64,

        /// Red reflectance DN
        #[arg(long)]
        red: f64,

        /// NIR reflectance DN
        #[arg(long)]
        nir: f64,

        /// ST_TRAD DN
        #[arg(long)]
        trad: Option<f64>,

        /// ST_URAD DN
        #[arg(long)]
        urad: Option<f64>,

        /// ST_ATRAN DN
        #[arg(long)]
        atran: Option<f64>,

        /// ST_DRAD DN
        #[arg(long)]
        drad: Option<f64>,

        /// Output temperature unit
        #[arg(long, value_enum, default_value = "celsius")]
        unit: UnitArg,
    },

    /// Show the sensor profile table
    Profiles,

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            catalog,
            sensor,
            start,
            end,
            path,
            row,
            include_months,
            exclude_months,
            cloud_min,
            cloud_max,
            unit,
            output,
            scale,
            layers,
            verbose,
        } => commands::run::run(RunArgs {
            catalog,
            sensor,
            start,
            end,
            path,
            row,
            include_months,
            exclude_months,
            cloud_min,
            cloud_max,
            unit,
            output,
            scale,
            layers,
            verbose,
        }),
        Commands::Sample {
            sensor,
            thermal,
            red,
            nir,
            trad,
            urad,
            atran,
            drad,
            unit,
        } => commands::sample::run(SampleArgs {
            sensor,
            thermal,
            red,
            nir,
            trad,
            urad,
            atran,
            drad,
            unit,
        }),
        Commands::Profiles => {
            commands::profiles::run();
            Ok(())
        }
        Commands::Config { command } => commands::config::run(command),
        Commands::Init { force } => commands::init::run(force),
    };

    if let Err(e) = result {
        report(&e);
        process::exit(1);
    }
}

fn report(error: &CliError) {
    match error {
        CliError::Pipeline(PipelineError::EmptySelection(diagnostic)) => {
            eprintln!("{} {}", style("Warning:").yellow().bold(), diagnostic);
        }
        _ => eprintln!("{} {}", style("Error:").red().bold(), error),
    }
}
