//! Session display settings
//!
//! [`RdpDisplaySettings`] is what the serializer writes for the display and
//! performance part of an `.rdp` file. It is derived from the local display
//! and then adjusted by the selected [`QualityProfile`].

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::models::{DisplayConfiguration, QualityProfile};

/// Resolution cap applied by the performance profile
const PERFORMANCE_MAX_WIDTH: u32 = 1920;
const PERFORMANCE_MAX_HEIGHT: u32 = 1080;

/// Display and performance directives of an `.rdp` file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdpDisplaySettings {
    /// `desktopwidth`
    pub desktop_width: u32,
    /// `desktopheight`
    pub desktop_height: u32,
    /// `session bpp`
    pub session_bpp: i32,
    /// `desktopscalefactor`, in percent
    pub desktop_scale_factor: u32,
    /// `smart sizing`
    pub smart_sizing: bool,
    /// `compression`, 0..=2
    pub compression: i32,
    /// `bitmapcachepersistenable`
    pub bitmap_cache_persist: bool,
    /// `disable wallpaper`
    pub disable_wallpaper: bool,
    /// `allow font smoothing`
    pub allow_font_smoothing: bool,
    /// `screen mode id`: 1 windowed, 2 full screen
    pub screen_mode_id: i32,
    /// `disable menu anims`
    pub disable_menu_anims: bool,
    /// `disable themes`
    pub disable_themes: bool,
    /// `audiomode`
    pub audio_mode: i32,
}

impl Default for RdpDisplaySettings {
    fn default() -> Self {
        Self::for_display(&DisplayConfiguration::default())
    }
}

impl RdpDisplaySettings {
    /// Baseline settings for a display, before any profile is applied
    #[must_use]
    pub fn for_display(display: &DisplayConfiguration) -> Self {
        let retina = display.is_retina();
        let compression = i32::from(!retina);
        Self {
            desktop_width: display.optimal_width(),
            desktop_height: display.optimal_height(),
            session_bpp: i32::try_from(display.recommended_color_depth()).unwrap_or(24),
            desktop_scale_factor: display.scale_percent(),
            smart_sizing: true,
            compression,
            bitmap_cache_persist: true,
            disable_wallpaper: false,
            allow_font_smoothing: retina,
            screen_mode_id: 2,
            disable_menu_anims: compression > 1,
            disable_themes: compression > 1,
            audio_mode: 0,
        }
    }

    /// Baseline for `display` with `profile` applied on top
    #[must_use]
    pub fn for_profile(profile: &QualityProfile, display: &DisplayConfiguration) -> Self {
        let quality = profile.settings();
        let mut settings = Self::for_display(display);

        settings.session_bpp = quality.color_depth;
        settings.compression = quality.compression_level;
        settings.allow_font_smoothing = quality.enable_font_smoothing || display.is_hidpi;
        settings.disable_wallpaper = !quality.enable_wallpaper;
        settings.disable_menu_anims = !quality.enable_menu_animations;
        settings.disable_themes = !quality.enable_themes;
        settings.audio_mode = quality.audio_quality.audio_mode();

        if display.is_4k() && display.is_hidpi && settings.compression == 2 {
            settings.compression = 1;
        }

        if matches!(profile, QualityProfile::Performance) {
            settings.desktop_width = settings.desktop_width.min(PERFORMANCE_MAX_WIDTH);
            settings.desktop_height = settings.desktop_height.min(PERFORMANCE_MAX_HEIGHT);
            settings.screen_mode_id = 1;
            settings.bitmap_cache_persist = false;
        }

        tracing::debug!(
            profile = profile.identifier(),
            width = settings.desktop_width,
            height = settings.desktop_height,
            bpp = settings.session_bpp,
            compression = settings.compression,
            "Derived RDP display settings"
        );

        settings
    }

    /// Checks that every value is one an RDP client accepts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first out-of-range field.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |what: String| Err(ConfigError::Invalid(what));

        if !(640..=7680).contains(&self.desktop_width) {
            return invalid(format!("desktopwidth {} outside 640-7680", self.desktop_width));
        }
        if !(480..=4320).contains(&self.desktop_height) {
            return invalid(format!("desktopheight {} outside 480-4320", self.desktop_height));
        }
        if ![16, 24, 32].contains(&self.session_bpp) {
            return invalid(format!("session bpp {} not 16, 24 or 32", self.session_bpp));
        }
        if !(100..=500).contains(&self.desktop_scale_factor) {
            return invalid(format!(
                "desktopscalefactor {} outside 100-500",
                self.desktop_scale_factor
            ));
        }
        if !(0..=2).contains(&self.compression) {
            return invalid(format!("compression {} outside 0-2", self.compression));
        }
        if ![1, 2].contains(&self.screen_mode_id) {
            return invalid(format!("screen mode id {} not 1 or 2", self.screen_mode_id));
        }
        Ok(())
    }
}
