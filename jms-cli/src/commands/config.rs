//! Config command: inspect and initialise the settings file.

use std::path::Path;

use jms_core::config::HandlerSettings;

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::util::create_config_manager;

/// Config command handler
pub fn cmd_config(config_path: Option<&Path>, subcmd: ConfigCommands) -> Result<(), CliError> {
    let manager = create_config_manager(config_path)?;

    match subcmd {
        ConfigCommands::Show => {
            let settings = manager.load_settings()?;
            let text = toml::to_string_pretty(&settings)
                .map_err(|e| CliError::Output(format!("Failed to render settings: {e}")))?;
            if !manager.settings_exist() {
                println!("# {} not found, showing defaults", manager.settings_path().display());
            }
            print!("{text}");
        }
        ConfigCommands::Path => {
            println!("{}", manager.settings_path().display());
        }
        ConfigCommands::Init { force } => {
            if manager.settings_exist() && !force {
                return Err(CliError::Config(format!(
                    "{} already exists, use --force to overwrite",
                    manager.settings_path().display()
                )));
            }
            manager.save_settings(&HandlerSettings::default())?;
            println!("Wrote {}", manager.settings_path().display());
        }
    }
    Ok(())
}
