//! Handler settings persisted as TOML

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::detection::TerminalApp;
use crate::error::{ConfigError, ConfigResult};
use crate::models::{DisplayConfiguration, QualityProfile, RdpQualitySettings};
use crate::ssh::DEFAULT_AUTOMATION_TIMEOUT_SECS;
use crate::tracing::TracingLevel;

/// Default delay before a written `.rdp` file is removed
pub const DEFAULT_CLEANUP_DELAY_SECS: u64 = 30;

/// Top-level settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlerSettings {
    /// RDP artifact settings
    #[serde(default)]
    pub rdp: RdpSettings,
    /// Display characteristics override
    #[serde(default)]
    pub display: DisplayConfiguration,
    /// SSH settings
    #[serde(default)]
    pub ssh: SshSettings,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl HandlerSettings {
    /// The configured quality profile, with custom settings resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an unknown profile name.
    pub fn quality_profile(&self) -> ConfigResult<QualityProfile> {
        match self.rdp.profile.parse::<QualityProfile>()? {
            QualityProfile::Custom(_) => Ok(QualityProfile::Custom(
                self.rdp.custom_quality.unwrap_or_default(),
            )),
            preset => Ok(preset),
        }
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> ConfigResult<()> {
        self.quality_profile()?;
        if let Some(custom) = &self.rdp.custom_quality {
            custom.validate()?;
        }
        if self.rdp.opener.trim().is_empty() {
            return Err(ConfigError::Invalid("rdp.opener must not be empty".into()));
        }
        self.display.validate()?;
        if self.ssh.automation_timeout == 0 {
            return Err(ConfigError::Invalid(
                "ssh.automation_timeout must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// `[rdp]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdpSettings {
    /// `performance`, `balanced`, `quality` or `custom`
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Settings used when `profile = "custom"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_quality: Option<RdpQualitySettings>,
    /// Program that opens `.rdp` files
    #[serde(default = "default_opener")]
    pub opener: String,
    /// Arguments placed before the file path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub opener_args: Vec<String>,
    /// Seconds before the written file is deleted
    #[serde(default = "default_cleanup_delay")]
    pub cleanup_delay: u64,
    /// Directory for written files; the system temp dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

fn default_profile() -> String {
    QualityProfile::Balanced.identifier().to_string()
}

fn default_opener() -> String {
    if cfg!(target_os = "macos") {
        "open".to_string()
    } else {
        "xdg-open".to_string()
    }
}

const fn default_cleanup_delay() -> u64 {
    DEFAULT_CLEANUP_DELAY_SECS
}

impl Default for RdpSettings {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            custom_quality: None,
            opener: default_opener(),
            opener_args: Vec::new(),
            cleanup_delay: DEFAULT_CLEANUP_DELAY_SECS,
            output_dir: None,
        }
    }
}

/// `[ssh]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshSettings {
    /// Type the password with `expect` when it is installed
    #[serde(default = "default_true")]
    pub allow_password_automation: bool,
    /// Seconds `expect` waits for each prompt
    #[serde(default = "default_automation_timeout")]
    pub automation_timeout: u32,
    /// Terminal to prefer when several are installed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<TerminalApp>,
}

const fn default_true() -> bool {
    true
}

const fn default_automation_timeout() -> u32 {
    DEFAULT_AUTOMATION_TIMEOUT_SECS
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            allow_password_automation: true,
            automation_timeout: DEFAULT_AUTOMATION_TIMEOUT_SECS,
            terminal: None,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level used when no `-v` flag is given
    #[serde(default)]
    pub level: TracingLevel,
    /// Log file; stderr when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
