//! Run command - select scenes, derive LST and submit exports.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use console::style;
use landsat_lst::catalog::{CatalogManifest, MemoryCatalog, MonthSet};
use landsat_lst::config::ConfigFile;
use landsat_lst::export::{DispatchFailure, ManifestSink};
use landsat_lst::lst::LstEngine;
use landsat_lst::pipeline::{LstPipeline, PipelineReport};
use landsat_lst::sensor::SensorProfile;
use landsat_lst::viz::{LayerList, Visualizer};

use super::common::{spinner, SensorArg, UnitArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command. Unset values fall back to the config file.
pub struct RunArgs {
    pub catalog: PathBuf,
    pub sensor: Option<SensorArg>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub path: Option<u16>,
    pub row: Option<u16>,
    pub include_months: Option<MonthSet>,
    pub exclude_months: Option<MonthSet>,
    pub cloud_min: Option<f64>,
    pub cloud_max: Option<f64>,
    pub unit: Option<UnitArg>,
    pub output: Option<PathBuf>,
    pub scale: Option<f64>,
    pub layers: bool,
    pub verbose: bool,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("run");
    let config = resolve_config(runner.config(), &args);

    let query = config.query_builder().build()?;
    let catalog = load_catalog(&args.catalog)?;
    let sink = ManifestSink::new(&config.export.output_dir);

    println!("Landsat LST v{}", landsat_lst::VERSION);
    println!("==================");
    println!();
    println!("Query:   {}", query);
    println!("Catalog: {} ({} scenes)", args.catalog.display(), catalog.len());
    println!("Output:  {}", sink.output_dir().display());
    println!("Unit:    {}", config.engine.unit);
    println!();

    let pb = spinner("Deriving LST and submitting exports...");
    let result = LstPipeline::new(&catalog, &sink)
        .with_engine(LstEngine::new(config.engine.unit))
        .with_export_params(config.export.params())
        .run(&query);
    pb.finish_and_clear();
    let report = result?;

    print_report(&report);

    if args.layers {
        print_layers(&catalog, &report, &config, query.sensor().profile())?;
    }

    Ok(())
}

/// Apply command line overrides on top of the config file.
fn resolve_config(config: &ConfigFile, args: &RunArgs) -> ConfigFile {
    let mut config = config.clone();
    let query = &mut config.query;
    if let Some(sensor) = args.sensor {
        query.sensor = sensor.into();
    }
    query.start_date = args.start.or(query.start_date);
    query.end_date = args.end.or(query.end_date);
    query.path = args.path.unwrap_or(query.path);
    query.row = args.row.unwrap_or(query.row);
    query.include_months = args.include_months.unwrap_or(query.include_months);
    query.exclude_months = args.exclude_months.unwrap_or(query.exclude_months);
    query.cloud_cover_min = args.cloud_min.unwrap_or(query.cloud_cover_min);
    query.cloud_cover_max = args.cloud_max.unwrap_or(query.cloud_cover_max);

    if let Some(unit) = args.unit {
        config.engine.unit = unit.into();
    }
    if let Some(output) = &args.output {
        config.export.output_dir = output.clone();
    }
    config.export.scale = args.scale.unwrap_or(config.export.scale);
    config
}

fn load_catalog(path: &Path) -> Result<MemoryCatalog, CliError> {
    let pb = spinner("Loading catalog...");
    let catalog = CatalogManifest::load(path).and_then(CatalogManifest::into_catalog);
    pb.finish_and_clear();
    Ok(catalog?)
}

fn print_report(report: &PipelineReport) {
    println!("Scenes selected: {}", report.selected);
    println!("Scenes derived:  {}", report.products.len());
    for failure in &report.scene_failures {
        println!("  {} {}", style("skipped").yellow(), failure);
    }
    println!();

    println!("Export jobs: {}", report.dispatch.submitted.len());
    for job in &report.dispatch.submitted {
        println!("  {} {} -> {}", style("✓").green(), job.description, job.handle);
    }
    for failure in &report.dispatch.failures {
        match failure {
            DispatchFailure::Naming { scene, error } => {
                println!("  {} {}: {}", style("✗").red(), scene, error)
            }
            DispatchFailure::Submission {
                description, error, ..
            } => println!("  {} {}: {}", style("✗").red(), description, error),
        }
    }
}

fn print_layers(
    catalog: &MemoryCatalog,
    report: &PipelineReport,
    config: &ConfigFile,
    profile: &SensorProfile,
) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let layers = LayerList::new();
    let viz = runtime.block_on(
        Visualizer::new(catalog, &layers, config.engine.unit).register(&report.products, profile),
    );

    println!();
    println!("Display layers: {}", viz.layers);
    for layer in layers.layers() {
        println!(
            "  {} [{}, {}]{}",
            layer.name,
            layer.params.min,
            layer.params.max,
            layer
                .params
                .gamma
                .map(|g| format!(" gamma {g}"))
                .unwrap_or_default()
        );
    }
    for (scene, error) in &viz.skipped {
        println!("  {} {}: {}", style("skipped").yellow(), scene, error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landsat_lst::lst::TemperatureUnit;
    use landsat_lst::sensor::SensorId;

    fn args() -> RunArgs {
        RunArgs {
            catalog: PathBuf::from("scenes.json"),
            sensor: None,
            start: None,
            end: None,
            path: None,
            row: None,
            include_months: None,
            exclude_months: None,
            cloud_min: None,
            cloud_max: None,
            unit: None,
            output: None,
            scale: None,
            layers: false,
            verbose: false,
        }
    }

    #[test]
    fn test_config_values_used_without_flags() {
        let mut config = ConfigFile::default();
        config.query.row = 45;
        let resolved = resolve_config(&config, &args());
        assert_eq!(resolved, config);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = ConfigFile::default();
        config.query.start_date = "2020-01-01".parse().ok();
        let args = RunArgs {
            sensor: Some(SensorArg::L8),
            end: "2020-02-01".parse().ok(),
            cloud_max: Some(20.0),
            unit: Some(UnitArg::Kelvin),
            output: Some(PathBuf::from("/tmp/out")),
            ..args()
        };

        let resolved = resolve_config(&config, &args);
        assert_eq!(resolved.query.sensor, SensorId::Landsat8);
        assert_eq!(resolved.query.start_date, config.query.start_date);
        assert_eq!(resolved.query.end_date, "2020-02-01".parse().ok());
        assert_eq!(resolved.query.cloud_cover_max, 20.0);
        assert_eq!(resolved.engine.unit, TemperatureUnit::Kelvin);
        assert_eq!(resolved.export.output_dir, PathBuf::from("/tmp/out"));
        assert!(resolved.query_builder().build().is_ok());
    }

    #[test]
    fn test_missing_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CliError::Catalog(_)));
    }
}
