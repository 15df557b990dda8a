//! Shared command setup: configuration and logging.

use landsat_lst::config::{config_file_path, ConfigFile};
use landsat_lst::logging::{self, WorkerGuard};
use tracing::info;

use crate::error::CliError;

/// Loaded configuration plus the logging guard of the running command.
pub struct CliRunner {
    config: ConfigFile,
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Load the config file and install logging. `verbose` raises the
    /// level to `debug`.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let mut logging_config = config.logging.clone();
        if verbose {
            logging_config.level = "debug".to_string();
        }
        let log_guard = logging::init(&logging_config)?;
        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = landsat_lst::VERSION,
            command,
            config = %config_file_path().display(),
            "landsat-lst starting"
        );
    }
}
