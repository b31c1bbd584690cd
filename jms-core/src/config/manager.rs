//! Loading and saving the settings file

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

use super::settings::HandlerSettings;

/// Environment variable that overrides the configuration directory
pub const CONFIG_DIR_ENV: &str = "JMS_HANDLER_CONFIG_DIR";

/// Directory name under the platform config directory
const APP_DIR_NAME: &str = "jms-handler";

/// Settings file name
const SETTINGS_FILE: &str = "config.toml";

/// Reads and writes [`HandlerSettings`] in a configuration directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses `$JMS_HANDLER_CONFIG_DIR`, or `<config_dir>/jms-handler`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if neither is available.
    pub fn new() -> ConfigResult<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_config_dir(PathBuf::from(dir)));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR_NAME)))
    }

    /// Uses an explicit directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The configuration directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Whether the settings file exists
    #[must_use]
    pub fn settings_exist(&self) -> bool {
        self.settings_path().is_file()
    }

    /// Loads settings; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// TOML for the schema, or holds out-of-range values.
    pub fn load_settings(&self) -> ConfigResult<HandlerSettings> {
        let path = self.settings_path();
        let _span = tracing::debug_span!(crate::tracing::span_names::CONFIG_LOAD).entered();

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(HandlerSettings::default());
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let settings = Self::parse_settings(&text)?;
        tracing::debug!(path = %path.display(), profile = %settings.rdp.profile, "Settings loaded");
        Ok(settings)
    }

    /// Parses and validates settings text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn parse_settings(text: &str) -> ConfigResult<HandlerSettings> {
        let settings: HandlerSettings =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes settings, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid, cannot be serialized,
    /// or the file cannot be written.
    pub fn save_settings(&self, settings: &HandlerSettings) -> ConfigResult<()> {
        let _span = tracing::debug_span!(crate::tracing::span_names::CONFIG_SAVE).entered();
        settings.validate()?;

        let text =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;

        let path = self.settings_path();
        std::fs::write(&path, text).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), "Settings saved");
        Ok(())
    }
}
