//! RDP quality presets
//!
//! A [`QualityProfile`] names one of three presets or carries user-defined
//! [`RdpQualitySettings`]. Profiles are merged with the detected display in
//! [`crate::rdp::RdpDisplaySettings::for_profile`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Audio redirection quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    /// No audio
    Disabled,
    /// Low bandwidth audio
    Low,
    /// Default quality
    #[default]
    Medium,
    /// Full quality
    High,
}

impl AudioQuality {
    /// RDP `audiomode` value: 0 plays locally, 1 plays remotely, 2 disables
    #[must_use]
    pub const fn audio_mode(self) -> i32 {
        match self {
            Self::Disabled => 2,
            Self::Low => 1,
            Self::Medium | Self::High => 0,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "Disabled",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Quality knobs that a profile controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdpQualitySettings {
    /// 0 = none, 1 = medium, 2 = high
    pub compression_level: i32,
    /// Session colour depth in bits
    pub color_depth: i32,
    /// Audio redirection quality
    #[serde(default)]
    pub audio_quality: AudioQuality,
    /// ClearType font smoothing
    #[serde(default)]
    pub enable_font_smoothing: bool,
    /// Show desktop wallpaper
    #[serde(default)]
    pub enable_wallpaper: bool,
    /// Menu and window animations
    #[serde(default)]
    pub enable_menu_animations: bool,
    /// Visual themes
    #[serde(default)]
    pub enable_themes: bool,
}

impl RdpQualitySettings {
    /// Low bandwidth preset
    pub const PERFORMANCE: Self = Self {
        compression_level: 2,
        color_depth: 16,
        audio_quality: AudioQuality::Disabled,
        enable_font_smoothing: false,
        enable_wallpaper: false,
        enable_menu_animations: false,
        enable_themes: false,
    };

    /// Default preset
    pub const BALANCED: Self = Self {
        compression_level: 1,
        color_depth: 24,
        audio_quality: AudioQuality::Medium,
        enable_font_smoothing: true,
        enable_wallpaper: true,
        enable_menu_animations: false,
        enable_themes: true,
    };

    /// High bandwidth preset
    pub const QUALITY: Self = Self {
        compression_level: 0,
        color_depth: 32,
        audio_quality: AudioQuality::High,
        enable_font_smoothing: true,
        enable_wallpaper: true,
        enable_menu_animations: true,
        enable_themes: true,
    };

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the compression level is outside
    /// 0..=2 or the colour depth is not 16, 24 or 32.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0..=2).contains(&self.compression_level) {
            return Err(ConfigError::Invalid(format!(
                "compression_level must be 0-2, got {}",
                self.compression_level
            )));
        }
        if ![16, 24, 32].contains(&self.color_depth) {
            return Err(ConfigError::Invalid(format!(
                "color_depth must be 16, 24 or 32, got {}",
                self.color_depth
            )));
        }
        Ok(())
    }
}

impl Default for RdpQualitySettings {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// A named or custom quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityProfile {
    /// Favour responsiveness over fidelity
    Performance,
    /// Sensible middle ground
    #[default]
    Balanced,
    /// Favour fidelity over bandwidth
    Quality,
    /// User-defined settings
    Custom(RdpQualitySettings),
}

impl QualityProfile {
    /// The three built-in presets in display order
    pub const PRESETS: [Self; 3] = [Self::Performance, Self::Balanced, Self::Quality];

    /// Stable identifier used in configuration and on the command line
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::Performance => "performance",
            Self::Balanced => "balanced",
            Self::Quality => "quality",
            Self::Custom(_) => "custom",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Performance => "Performance",
            Self::Balanced => "Balanced",
            Self::Quality => "Quality",
            Self::Custom(_) => "Custom",
        }
    }

    /// Resolves an identifier. `custom` starts from the balanced settings.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "performance" => Some(Self::Performance),
            "balanced" => Some(Self::Balanced),
            "quality" => Some(Self::Quality),
            "custom" => Some(Self::Custom(RdpQualitySettings::BALANCED)),
            _ => None,
        }
    }

    /// The quality settings this profile stands for
    #[must_use]
    pub const fn settings(&self) -> RdpQualitySettings {
        match self {
            Self::Performance => RdpQualitySettings::PERFORMANCE,
            Self::Balanced => RdpQualitySettings::BALANCED,
            Self::Quality => RdpQualitySettings::QUALITY,
            Self::Custom(settings) => *settings,
        }
    }
}

impl fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for QualityProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown quality profile '{s}'")))
    }
}
