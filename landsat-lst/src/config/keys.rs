//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{parse_value, ConfigError, ConfigFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    QuerySensor,
    QueryStartDate,
    QueryEndDate,
    QueryPath,
    QueryRow,
    QueryIncludeMonths,
    QueryExcludeMonths,
    QueryCloudCoverMin,
    QueryCloudCoverMax,
    EngineUnit,
    ExportOutputDir,
    ExportScale,
    ExportMaxPixels,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 15] = [
    ConfigKey::QuerySensor,
    ConfigKey::QueryStartDate,
    ConfigKey::QueryEndDate,
    ConfigKey::QueryPath,
    ConfigKey::QueryRow,
    ConfigKey::QueryIncludeMonths,
    ConfigKey::QueryExcludeMonths,
    ConfigKey::QueryCloudCoverMin,
    ConfigKey::QueryCloudCoverMax,
    ConfigKey::EngineUnit,
    ConfigKey::ExportOutputDir,
    ConfigKey::ExportScale,
    ConfigKey::ExportMaxPixels,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::QuerySensor
            | ConfigKey::QueryStartDate
            | ConfigKey::QueryEndDate
            | ConfigKey::QueryPath
            | ConfigKey::QueryRow
            | ConfigKey::QueryIncludeMonths
            | ConfigKey::QueryExcludeMonths
            | ConfigKey::QueryCloudCoverMin
            | ConfigKey::QueryCloudCoverMax => "query",
            ConfigKey::EngineUnit => "engine",
            ConfigKey::ExportOutputDir | ConfigKey::ExportScale | ConfigKey::ExportMaxPixels => {
                "export"
            }
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::QuerySensor => "sensor",
            ConfigKey::QueryStartDate => "start_date",
            ConfigKey::QueryEndDate => "end_date",
            ConfigKey::QueryPath => "path",
            ConfigKey::QueryRow => "row",
            ConfigKey::QueryIncludeMonths => "include_months",
            ConfigKey::QueryExcludeMonths => "exclude_months",
            ConfigKey::QueryCloudCoverMin => "cloud_cover_min",
            ConfigKey::QueryCloudCoverMax => "cloud_cover_max",
            ConfigKey::EngineUnit => "unit",
            ConfigKey::ExportOutputDir => "output_dir",
            ConfigKey::ExportScale => "scale",
            ConfigKey::ExportMaxPixels => "max_pixels",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written to the file. Unset values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        let query = &config.query;
        match self {
            ConfigKey::QuerySensor => query.sensor.key().to_string(),
            ConfigKey::QueryStartDate => optional(&query.start_date),
            ConfigKey::QueryEndDate => optional(&query.end_date),
            ConfigKey::QueryPath => query.path.to_string(),
            ConfigKey::QueryRow => query.row.to_string(),
            ConfigKey::QueryIncludeMonths => query.include_months.to_string(),
            ConfigKey::QueryExcludeMonths => query.exclude_months.to_string(),
            ConfigKey::QueryCloudCoverMin => query.cloud_cover_min.to_string(),
            ConfigKey::QueryCloudCoverMax => query.cloud_cover_max.to_string(),
            ConfigKey::EngineUnit => config.engine.unit.to_string(),
            ConfigKey::ExportOutputDir => config.export.output_dir.display().to_string(),
            ConfigKey::ExportScale => config.export.scale.to_string(),
            ConfigKey::ExportMaxPixels => config.export.max_pixels.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate and store `value`. An empty value clears optional keys.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let section = self.section();
        let key = self.key_name();
        let query = &mut config.query;
        match self {
            ConfigKey::QuerySensor => query.sensor = parse_value(section, key, value)?,
            ConfigKey::QueryStartDate => query.start_date = parse_optional(section, key, value)?,
            ConfigKey::QueryEndDate => query.end_date = parse_optional(section, key, value)?,
            ConfigKey::QueryPath => query.path = parse_value(section, key, value)?,
            ConfigKey::QueryRow => query.row = parse_value(section, key, value)?,
            ConfigKey::QueryIncludeMonths => query.include_months = parse_value(section, key, value)?,
            ConfigKey::QueryExcludeMonths => query.exclude_months = parse_value(section, key, value)?,
            ConfigKey::QueryCloudCoverMin => {
                query.cloud_cover_min = parse_value(section, key, value)?
            }
            ConfigKey::QueryCloudCoverMax => {
                query.cloud_cover_max = parse_value(section, key, value)?
            }
            ConfigKey::EngineUnit => config.engine.unit = parse_value(section, key, value)?,
            ConfigKey::ExportOutputDir => config.export.output_dir = PathBuf::from(value),
            ConfigKey::ExportScale => config.export.scale = parse_value(section, key, value)?,
            ConfigKey::ExportMaxPixels => {
                config.export.max_pixels = parse_value(section, key, value)?
            }
            ConfigKey::LoggingLevel => config.logging.level = value.to_string(),
            ConfigKey::LoggingDirectory => {
                config.logging.directory = parse_optional(section, key, value)?
            }
        }
        Ok(())
    }
}

fn optional<T: fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn parse_optional<T>(section: &str, key: &str, value: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if value.is_empty() {
        Ok(None)
    } else {
        parse_value(section, key, value).map(Some)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lst::TemperatureUnit;
    use crate::sensor::SensorId;

    #[test]
    fn test_parse_key() {
        assert_eq!("query.sensor".parse::<ConfigKey>().unwrap(), ConfigKey::QuerySensor);
        assert_eq!("Engine.Unit".parse::<ConfigKey>().unwrap(), ConfigKey::EngineUnit);
        assert!(matches!(
            "query.color".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_key_round_trips_its_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_get_and_set() {
        let mut config = ConfigFile::default();
        assert_eq!(ConfigKey::QuerySensor.get(&config), "l9");
        assert_eq!(ConfigKey::QueryStartDate.get(&config), "");

        ConfigKey::QuerySensor.set(&mut config, "landsat 5").unwrap();
        ConfigKey::EngineUnit.set(&mut config, "kelvin").unwrap();
        ConfigKey::QueryStartDate.set(&mut config, "2008-07-01").unwrap();
        assert_eq!(config.query.sensor, SensorId::Landsat5);
        assert_eq!(config.engine.unit, TemperatureUnit::Kelvin);
        assert_eq!(ConfigKey::QueryStartDate.get(&config), "2008-07-01");

        ConfigKey::QueryStartDate.set(&mut config, "").unwrap();
        assert!(config.query.start_date.is_none());
    }

    #[test]
    fn test_set_rejects_invalid_value() {
        let mut config = ConfigFile::default();
        let err = ConfigKey::QueryRow.set(&mut config, "-3").unwrap_err();
        assert!(err.to_string().contains("query.row"));
        assert_eq!(config.query.row, 44);
    }
}
