//! Profiles command: list RDP quality profiles.

use std::path::Path;

use jms_core::models::QualityProfile;

use crate::error::CliError;
use crate::util::load_settings;

/// Profiles command handler
pub fn cmd_profiles(config_path: Option<&Path>) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let configured = settings.quality_profile()?;

    println!(
        "  {:<12} {:<12} {:>5} {:>11} {:<8}",
        "ID", "NAME", "DEPTH", "COMPRESSION", "AUDIO"
    );

    let mut profiles = QualityProfile::PRESETS.to_vec();
    if matches!(configured, QualityProfile::Custom(_)) {
        profiles.push(configured);
    }

    for profile in &profiles {
        let marker = if profile.identifier() == configured.identifier() {
            '*'
        } else {
            ' '
        };
        let quality = profile.settings();
        println!(
            "{marker} {:<12} {:<12} {:>5} {:>11} {:<8}",
            profile.identifier(),
            profile.display_name(),
            quality.color_depth,
            quality.compression_level,
            quality.audio_quality.label()
        );
    }
    Ok(())
}
