//! `config` subcommands: inspect and edit the INI configuration file.

use clap::Subcommand;
use landsat_lst::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting
    Get {
        /// Setting as section.key (e.g., query.cloud_cover_max)
        key: String,
    },

    /// Change one setting; an empty value clears optional settings
    Set {
        /// Setting as section.key (e.g., engine.unit)
        key: String,

        value: String,
    },

    /// Print every setting, marking the ones changed from the defaults
    List,

    /// Print the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = parse_key(&key)?;
            println!("{}", display_value(&key.get(&ConfigFile::load()?)));
        }
        ConfigCommands::Set { key, value } => {
            let key = parse_key(&key)?;
            let mut config = ConfigFile::load()?;
            let previous = key.get(&config);
            key.set(&mut config, &value)?;
            config.save()?;
            println!(
                "{}: {} -> {}",
                key,
                display_value(&previous),
                display_value(&key.get(&config))
            );
        }
        ConfigCommands::List => {
            println!("# {}", config_file_path().display());
            for line in listing(&ConfigFile::load()?) {
                println!("{line}");
            }
        }
        ConfigCommands::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "No setting named '{}'; 'landsat-lst config list' shows them all",
            key
        ))
    })
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

/// INI-style listing of `config`. Settings that differ from the defaults
/// are prefixed with `*`.
fn listing(config: &ConfigFile) -> Vec<String> {
    let defaults = ConfigFile::default();
    let mut lines = Vec::new();
    let mut section = None;

    for key in ConfigKey::all() {
        if section != Some(key.section()) {
            lines.push(format!("[{}]", key.section()));
            section = Some(key.section());
        }
        let value = key.get(config);
        let marker = if value == key.get(&defaults) { ' ' } else { '*' };
        lines.push(format!("{marker} {} = {}", key.key_name(), display_value(&value)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_key() {
        assert_eq!(parse_key("engine.unit").unwrap(), ConfigKey::EngineUnit);
    }

    #[test]
    fn test_unknown_key_points_to_list() {
        let err = parse_key("query.color").unwrap_err();
        assert!(err.to_string().contains("config list"));
    }

    #[test]
    fn test_listing_marks_changed_settings() {
        let mut config = ConfigFile::default();
        ConfigKey::EngineUnit.set(&mut config, "kelvin").unwrap();

        let lines = listing(&config);
        assert_eq!(lines[0], "[query]");
        assert!(lines.contains(&"[engine]".to_string()));
        assert!(lines.contains(&"* unit = kelvin".to_string()));
        assert!(lines.contains(&"  row = 44".to_string()));
        assert!(lines.contains(&"  start_date = (unset)".to_string()));
        assert_eq!(lines.iter().filter(|l| l.starts_with('*')).count(), 1);
    }
}
