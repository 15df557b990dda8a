//! Init command - write the default configuration file.

use dialoguer::Confirm;
use landsat_lst::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command. `force` overwrites an existing file without asking.
pub fn run(force: bool) -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() && !force {
        println!("Configuration file already exists:");
        println!("  {}", path.display());
        println!();
        let overwrite = Confirm::new()
            .with_prompt("Replace it with the defaults?")
            .default(false)
            .interact()
            .map_err(|e| CliError::Config(format!("Prompt failed: {}", e)))?;
        if !overwrite {
            println!("Kept existing configuration.");
            return Ok(());
        }
    }

    ConfigFile::default().save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to set the default sensor, path/row and date range.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
