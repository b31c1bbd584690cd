//! `.rdp` file rendering

use crate::models::RdpConnectionInfo;

use super::parser::RdpDirective;
use super::settings::RdpDisplaySettings;

/// Renders an `.rdp` file for `info` using `settings`.
///
/// Lines come in three groups: the connection and display directives in a
/// fixed order, a block of connection-optimisation defaults, then every
/// additional directive from `info` in key order. An additional directive
/// whose key was already written replaces that line's value instead of
/// being repeated. Optional fields carried by `info` take precedence over
/// `settings`.
#[must_use]
pub fn render_rdp(info: &RdpConnectionInfo, settings: &RdpDisplaySettings) -> String {
    let directives = rdp_directives(info, settings);
    tracing::debug!(lines = directives.len(), "Rendered RDP file");
    directives
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The directives [`render_rdp`] writes, in output order
#[must_use]
pub fn rdp_directives(info: &RdpConnectionInfo, settings: &RdpDisplaySettings) -> Vec<RdpDirective> {
    let session_bpp = info.session_bpp.unwrap_or(settings.session_bpp);
    let smart_sizing = info.smart_sizing.unwrap_or(settings.smart_sizing);
    let screen_mode_id = info.screen_mode_id.unwrap_or(settings.screen_mode_id);
    let audio_mode = info.audio_mode.unwrap_or(settings.audio_mode);

    let mut directives = vec![
        RdpDirective::string("full address", &info.full_address),
        RdpDirective::string("username", &info.username),
        RdpDirective::integer("desktopwidth", settings.desktop_width),
        RdpDirective::integer("desktopheight", settings.desktop_height),
        RdpDirective::integer("session bpp", session_bpp),
        RdpDirective::integer("desktopscalefactor", settings.desktop_scale_factor),
        RdpDirective::flag("smart sizing", smart_sizing),
        RdpDirective::integer("compression", settings.compression),
        RdpDirective::flag("bitmapcachepersistenable", settings.bitmap_cache_persist),
        RdpDirective::flag("disable wallpaper", settings.disable_wallpaper),
        RdpDirective::flag("allow font smoothing", settings.allow_font_smoothing),
        RdpDirective::integer("screen mode id", screen_mode_id),
        // optimisation defaults
        RdpDirective::integer("connection type", 6),
        RdpDirective::flag("networkautodetect", true),
        RdpDirective::flag("bandwidthautodetect", true),
        RdpDirective::flag("displayconnectionbar", true),
        RdpDirective::flag("enableworkspacereconnect", false),
        RdpDirective::flag("disable full window drag", settings.compression > 0),
        RdpDirective::flag("disable menu anims", settings.disable_menu_anims),
        RdpDirective::flag("disable themes", settings.disable_themes),
        RdpDirective::flag("disable cursor setting", false),
        RdpDirective::integer("bitmapcachesize", 1500),
        RdpDirective::integer("audiomode", audio_mode),
        RdpDirective::integer("audiocapturemode", 0),
        RdpDirective::integer("videoplaybackmode", 1),
        RdpDirective::flag("redirectclipboard", true),
        RdpDirective::flag("redirectprinters", true),
        RdpDirective::flag("redirectcomports", false),
        RdpDirective::flag("redirectsmartcards", true),
        RdpDirective::flag("redirectdrives", false),
    ];

    for (key, value) in &info.additional_config {
        let directive = RdpDirective::inferred(key, value);
        match directives.iter_mut().find(|existing| existing.key == *key) {
            Some(existing) => *existing = directive,
            None => directives.push(directive),
        }
    }

    directives
}
