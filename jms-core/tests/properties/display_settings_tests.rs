//! Property tests for RDP display settings derivation

use jms_core::models::{DisplayConfiguration, QualityProfile};
use jms_core::rdp::{RdpDisplaySettings, parse_config_string, render_rdp};
use jms_core::RdpConnectionInfo;
use proptest::prelude::*;

fn arb_display() -> impl Strategy<Value = DisplayConfiguration> {
    (
        656u32..=7680,
        496u32..=4320,
        prop_oneof![Just(1.0f64), Just(1.25), Just(1.5), Just(2.0), Just(3.0)],
    )
        .prop_map(|(width, height, scale)| {
            DisplayConfiguration::new(width, height).with_hidpi(scale)
        })
}

fn arb_profile() -> impl Strategy<Value = QualityProfile> {
    prop_oneof![
        Just(QualityProfile::Performance),
        Just(QualityProfile::Balanced),
        Just(QualityProfile::Quality),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Preset profiles on realistic displays always produce accepted values
    #[test]
    fn presets_produce_valid_settings(profile in arb_profile(), display in arb_display()) {
        let settings = RdpDisplaySettings::for_profile(&profile, &display);
        prop_assert!(settings.validate().is_ok(), "{:?}", settings);
    }

    /// Session dimensions are multiples of 16 no larger than the display
    #[test]
    fn dimensions_are_aligned(profile in arb_profile(), display in arb_display()) {
        let settings = RdpDisplaySettings::for_profile(&profile, &display);
        prop_assert_eq!(settings.desktop_width % 16, 0);
        prop_assert_eq!(settings.desktop_height % 16, 0);
        prop_assert!(settings.desktop_width <= display.width);
        prop_assert!(settings.desktop_height <= display.height);
    }

    /// HiDPI displays always get font smoothing
    #[test]
    fn hidpi_forces_font_smoothing(profile in arb_profile(), display in arb_display()) {
        prop_assume!(display.is_hidpi);
        let settings = RdpDisplaySettings::for_profile(&profile, &display);
        prop_assert!(settings.allow_font_smoothing);
    }

    /// The rendered file is itself valid directive text with the address first
    #[test]
    fn rendered_file_parses(profile in arb_profile(), display in arb_display()) {
        let info = RdpConnectionInfo::new("h.example.com:3389", "alice");
        let text = render_rdp(&info, &RdpDisplaySettings::for_profile(&profile, &display));
        prop_assert!(text.starts_with("full address:s:h.example.com:3389\nusername:s:alice\n"));
        let map = parse_config_string(&text).unwrap();
        prop_assert_eq!(map["username"].as_str(), "alice");
    }
}
