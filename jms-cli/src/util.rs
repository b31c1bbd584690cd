//! Shared utility functions used across command modules.

use std::ffi::OsString;
use std::path::Path;

use jms_core::config::{ConfigManager, HandlerSettings};
use jms_core::models::QualityProfile;

use crate::error::CliError;

/// Options that consume the following argument
const VALUE_OPTIONS: [&str; 3] = ["-c", "--config", "--log-file"];

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads settings from the selected configuration directory
pub fn load_settings(config_path: Option<&Path>) -> Result<HandlerSettings, CliError> {
    let manager = create_config_manager(config_path)?;
    Ok(manager.load_settings()?)
}

/// The configured profile, or `name` resolved against the settings
pub fn resolve_profile(
    settings: &HandlerSettings,
    name: Option<&str>,
) -> Result<QualityProfile, CliError> {
    let Some(name) = name else {
        return Ok(settings.quality_profile()?);
    };
    let mut settings = settings.clone();
    settings.rdp.profile = name.to_string();
    settings
        .quality_profile()
        .map_err(|e| CliError::InvalidArgument(e.to_string()))
}

/// Inserts `open` before a bare `jms://` URL.
///
/// Operating systems invoke a URL handler as `jms-handler <url>`; every
/// other invocation is left untouched.
pub fn normalize_args(mut args: Vec<OsString>) -> Vec<OsString> {
    let mut index = 1;
    while index < args.len() {
        let arg = args[index].to_string_lossy();
        if VALUE_OPTIONS.contains(&arg.as_ref()) {
            index += 2;
            continue;
        }
        if arg.starts_with('-') {
            index += 1;
            continue;
        }
        if arg.to_ascii_lowercase().starts_with("jms://") {
            args.insert(index, OsString::from("open"));
        }
        break;
    }
    args
}

/// Replaces all but the length of a secret
pub fn mask(secret: &str) -> String {
    format!("******** ({} chars)", secret.chars().count())
}
