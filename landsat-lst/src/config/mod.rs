//! Configuration file.
//!
//! Settings live in an INI file under the user's config directory:
//!
//! ```ini
//! [query]
//! sensor = l9
//! start_date = 2022-09-01
//! end_date = 2022-10-01
//! path = 122
//! row = 44
//! include_months =
//! exclude_months = 1,2,12
//! cloud_cover_min = 0
//! cloud_cover_max = 100
//!
//! [engine]
//! unit = celsius
//!
//! [export]
//! output_dir = lst_exports
//! scale = 30
//! max_pixels = 10000000000000
//!
//! [logging]
//! level = info
//! directory =
//! ```
//!
//! Missing keys take their defaults. Command line flags override file
//! values.

mod keys;

pub use keys::ConfigKey;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use ini::{Ini, Properties};
use thiserror::Error;

use crate::catalog::MonthSet;
use crate::export::{ExportParams, DEFAULT_MAX_PIXELS, DEFAULT_SCALE_METERS};
use crate::logging::LoggingConfig;
use crate::lst::TemperatureUnit;
use crate::selector::{SceneQuery, SceneQueryBuilder};
use crate::sensor::SensorId;

const APP_DIR: &str = "landsat-lst";
const CONFIG_FILE: &str = "config.ini";

/// Default WRS-2 path.
pub const DEFAULT_PATH: u16 = 122;

/// Default WRS-2 row.
pub const DEFAULT_ROW: u16 = 44;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// `[query]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    pub sensor: SensorId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub path: u16,
    pub row: u16,
    pub include_months: MonthSet,
    pub exclude_months: MonthSet,
    pub cloud_cover_min: f64,
    pub cloud_cover_max: f64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            sensor: SensorId::Landsat9,
            start_date: None,
            end_date: None,
            path: DEFAULT_PATH,
            row: DEFAULT_ROW,
            include_months: MonthSet::empty(),
            exclude_months: MonthSet::empty(),
            cloud_cover_min: 0.0,
            cloud_cover_max: 100.0,
        }
    }
}

/// `[engine]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub unit: TemperatureUnit,
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub scale: f64,
    pub max_pixels: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("lst_exports"),
            scale: DEFAULT_SCALE_METERS,
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

impl ExportSettings {
    pub fn params(&self) -> ExportParams {
        ExportParams {
            scale_meters: self.scale,
            max_pixels: self.max_pixels,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub query: QuerySettings,
    pub engine: EngineSettings,
    pub export: ExportSettings,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Save to the default location, creating its directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        self.to_ini().write_to_file(path).map_err(write_error)
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("query")) {
            let query = &mut config.query;
            parse_into(section, "query", "sensor", &mut query.sensor)?;
            parse_optional(section, "query", "start_date", &mut query.start_date)?;
            parse_optional(section, "query", "end_date", &mut query.end_date)?;
            parse_into(section, "query", "path", &mut query.path)?;
            parse_into(section, "query", "row", &mut query.row)?;
            parse_into(section, "query", "include_months", &mut query.include_months)?;
            parse_into(section, "query", "exclude_months", &mut query.exclude_months)?;
            parse_into(section, "query", "cloud_cover_min", &mut query.cloud_cover_min)?;
            parse_into(section, "query", "cloud_cover_max", &mut query.cloud_cover_max)?;
        }

        if let Some(section) = ini.section(Some("engine")) {
            parse_into(section, "engine", "unit", &mut config.engine.unit)?;
        }

        if let Some(section) = ini.section(Some("export")) {
            let export = &mut config.export;
            parse_into(section, "export", "output_dir", &mut export.output_dir)?;
            parse_into(section, "export", "scale", &mut export.scale)?;
            parse_into(section, "export", "max_pixels", &mut export.max_pixels)?;
        }

        if let Some(section) = ini.section(Some("logging")) {
            if let Some(level) = value(section, "level") {
                config.logging.level = level.to_string();
            }
            parse_optional(section, "logging", "directory", &mut config.logging.directory)?;
        }

        Ok(config)
    }

    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// A query builder prefilled from the `[query]` section.
    pub fn query_builder(&self) -> SceneQueryBuilder {
        let query = &self.query;
        let mut builder = SceneQuery::builder()
            .sensor(query.sensor)
            .path_row(query.path, query.row)
            .include_months(query.include_months)
            .exclude_months(query.exclude_months)
            .cloud_cover(query.cloud_cover_min, query.cloud_cover_max);
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            builder = builder.date_range(start, end);
        }
        builder
    }
}

/// Non-empty, trimmed value of `key`.
fn value<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn parse_into<T>(section: &Properties, name: &str, key: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = value(section, key) {
        *target = parse_value(name, key, raw)?;
    }
    Ok(())
}

fn parse_optional<T>(
    section: &Properties,
    name: &str,
    key: &str,
    target: &mut Option<T>,
) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = value(section, key) {
        *target = Some(parse_value(name, key, raw)?);
    }
    Ok(())
}

pub(crate) fn parse_value<T>(section: &str, key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: format!("{section}.{key}"),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("none.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.query.path, 122);
        assert_eq!(config.query.row, 44);
        assert_eq!(config.query.sensor, SensorId::Landsat9);
        assert_eq!(config.logging.level, crate::logging::DEFAULT_LEVEL);
    }

    #[test]
    fn test_parse_sections() {
        let ini = Ini::load_from_str(
            "[query]\nsensor = landsat8\nstart_date = 2022-09-01\nend_date = 2022-10-01\n\
             exclude_months = 1,2\ncloud_cover_max = 30\n\
             [engine]\nunit = kelvin\n\
             [export]\nscale = 60\n\
             [logging]\nlevel = debug\ndirectory = /tmp/lst-logs\n",
        )
        .unwrap();
        let config = ConfigFile::from_ini(&ini).unwrap();

        assert_eq!(config.query.sensor, SensorId::Landsat8);
        assert_eq!(config.query.start_date, "2022-09-01".parse().ok());
        assert_eq!(config.query.exclude_months.to_string(), "1,2");
        assert!(config.query.include_months.is_empty());
        assert_eq!(config.query.cloud_cover_max, 30.0);
        assert_eq!(config.engine.unit, TemperatureUnit::Kelvin);
        assert_eq!(config.export.scale, 60.0);
        assert_eq!(config.export.max_pixels, DEFAULT_MAX_PIXELS);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.directory, Some(PathBuf::from("/tmp/lst-logs")));
    }

    #[test]
    fn test_invalid_value() {
        let ini = Ini::load_from_str("[query]\npath = north\n").unwrap();
        let err = ConfigFile::from_ini(&ini).unwrap_err();
        assert!(err.to_string().contains("query.path"));

        let ini = Ini::load_from_str("[query]\ninclude_months = 13\n").unwrap();
        assert!(ConfigFile::from_ini(&ini).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.query.start_date = "2021-06-01".parse().ok();
        config.query.end_date = "2021-09-01".parse().ok();
        config.query.include_months = MonthSet::new([6, 7]).unwrap();
        config.engine.unit = TemperatureUnit::Kelvin;
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_query_builder() {
        let mut config = ConfigFile::default();
        assert!(config.query_builder().build().is_err());

        config.query.start_date = "2022-09-01".parse().ok();
        config.query.end_date = "2022-10-01".parse().ok();
        let query = config.query_builder().build().unwrap();
        assert_eq!(query.collection_id(), "LANDSAT/LC09/C02/T1_L2");
        assert_eq!((query.path(), query.row()), (122, 44));
        assert_eq!(query.cloud_cover_range(), (0.0, 100.0));
    }

    #[test]
    fn test_config_path_location() {
        let path = config_file_path();
        assert!(path.ends_with("landsat-lst/config.ini"));
    }
}
