//! CLI error type.

use std::fmt;

use landsat_lst::catalog::CatalogError;
use landsat_lst::config::ConfigError;
use landsat_lst::logging::LoggingError;
use landsat_lst::pipeline::PipelineError;
use landsat_lst::raster::RasterError;
use landsat_lst::scene::SceneError;
use landsat_lst::selector::QueryError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or missing configuration.
    Config(String),
    /// Query parameters did not validate.
    Query(QueryError),
    /// Catalog could not be loaded.
    Catalog(CatalogError),
    /// The pipeline stopped before exporting.
    Pipeline(PipelineError),
    /// A scene lacks a band the retrieval reads.
    Scene(SceneError),
    /// Pixel evaluation failed.
    Raster(RasterError),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// Async runtime could not be started.
    Runtime(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Query(e) => write!(f, "Invalid query: {}", e),
            CliError::Catalog(e) => write!(f, "Catalog error: {}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Scene(e) => write!(f, "Scene error: {}", e),
            CliError::Raster(e) => write!(f, "Evaluation failed: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Query(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Scene(e) => Some(e),
            CliError::Raster(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Runtime(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<SceneError> for CliError {
    fn from(e: SceneError) -> Self {
        CliError::Scene(e)
    }
}

impl From<RasterError> for CliError {
    fn from(e: RasterError) -> Self {
        CliError::Raster(e)
    }
}
