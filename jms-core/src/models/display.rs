//! Local display characteristics
//!
//! The handler does not probe hardware itself. A [`DisplayProvider`] supplies
//! a [`DisplayConfiguration`], and the RDP optimizer derives session settings
//! from it.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, JmsResult};

/// Largest session width the optimizer will request
pub const MAX_SESSION_WIDTH: u32 = 3840;
/// Largest session height the optimizer will request
pub const MAX_SESSION_HEIGHT: u32 = 2160;

/// Characteristics of the display the session will be shown on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfiguration {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Backing scale factor (1.0 on standard displays)
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Colour depth in bits
    #[serde(default = "default_color_depth")]
    pub color_depth: u32,
    /// Whether the display is high density
    #[serde(default)]
    pub is_hidpi: bool,
}

const fn default_scale_factor() -> f64 {
    1.0
}

const fn default_color_depth() -> u32 {
    24
}

impl Default for DisplayConfiguration {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            scale_factor: 1.0,
            color_depth: 24,
            is_hidpi: false,
        }
    }
}

impl DisplayConfiguration {
    /// Creates a standard-density display
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
            color_depth: 24,
            is_hidpi: false,
        }
    }

    /// Marks the display as high density with the given scale factor
    #[must_use]
    pub const fn with_hidpi(mut self, scale_factor: f64) -> Self {
        self.is_hidpi = true;
        self.scale_factor = scale_factor;
        self
    }

    /// Sets the colour depth
    #[must_use]
    pub const fn with_color_depth(mut self, color_depth: u32) -> Self {
        self.color_depth = color_depth;
        self
    }

    /// HiDPI with a scale factor of at least 2
    #[must_use]
    pub fn is_retina(&self) -> bool {
        self.is_hidpi && self.scale_factor >= 2.0
    }

    /// 3840x2160 or larger
    #[must_use]
    pub const fn is_4k(&self) -> bool {
        self.width >= 3840 && self.height >= 2160
    }

    /// `WIDTHxHEIGHT`
    #[must_use]
    pub fn resolution_string(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Session width: capped at 4K and rounded down to a multiple of 16
    #[must_use]
    pub const fn optimal_width(&self) -> u32 {
        let width = if self.width < MAX_SESSION_WIDTH {
            self.width
        } else {
            MAX_SESSION_WIDTH
        };
        (width / 16) * 16
    }

    /// Session height: capped at 4K and rounded down to a multiple of 16
    #[must_use]
    pub const fn optimal_height(&self) -> u32 {
        let height = if self.height < MAX_SESSION_HEIGHT {
            self.height
        } else {
            MAX_SESSION_HEIGHT
        };
        (height / 16) * 16
    }

    /// RDP `desktopscalefactor` percentage
    #[must_use]
    pub fn scale_percent(&self) -> u32 {
        if self.is_hidpi {
            ((self.scale_factor * 100.0) as u32).clamp(100, 300)
        } else {
            100
        }
    }

    /// Session colour depth for this display
    #[must_use]
    pub fn recommended_color_depth(&self) -> u32 {
        match self.color_depth {
            32.. if self.is_retina() => 32,
            24.. => 24,
            _ => 16,
        }
    }

    /// Checks the values a provider or config file supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero dimensions or a
    /// non-positive scale factor.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size must be non-zero, got {}",
                self.resolution_string()
            )));
        }
        if !(self.scale_factor > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scale_factor must be positive, got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }
}

/// Supplies the characteristics of the primary display
pub trait DisplayProvider {
    /// Describes the display the session will open on.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::JmsError::DisplayDetectionFailed`] when no
    /// display can be described.
    fn primary_display(&self) -> JmsResult<DisplayConfiguration>;
}

/// Provider that always reports the same display, typically from config
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDisplayProvider {
    display: DisplayConfiguration,
}

impl StaticDisplayProvider {
    /// Creates a provider for a fixed display
    #[must_use]
    pub const fn new(display: DisplayConfiguration) -> Self {
        Self { display }
    }
}

impl DisplayProvider for StaticDisplayProvider {
    fn primary_display(&self) -> JmsResult<DisplayConfiguration> {
        Ok(self.display)
    }
}
