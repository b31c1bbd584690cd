//! Property-based tests for the tracing configuration

use jms_core::tracing::{TracingConfig, TracingLevel, TracingOutput};
use proptest::prelude::*;

// ========== Strategies ==========

/// Strategy for generating tracing levels
fn arb_tracing_level() -> impl Strategy<Value = TracingLevel> {
    prop_oneof![
        Just(TracingLevel::Error),
        Just(TracingLevel::Warn),
        Just(TracingLevel::Info),
        Just(TracingLevel::Debug),
        Just(TracingLevel::Trace),
    ]
}

/// Strategy for generating tracing output types
fn arb_tracing_output() -> impl Strategy<Value = TracingOutput> {
    prop_oneof![
        Just(TracingOutput::Stdout),
        Just(TracingOutput::Stderr),
        "[a-z]{1,8}".prop_map(|name| TracingOutput::File(format!("/tmp/{name}.log").into())),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Builder methods compose without interfering
    #[test]
    fn tracing_config_builder_composable(
        level in arb_tracing_level(),
        output in arb_tracing_output(),
        targets in any::<bool>(),
    ) {
        let config = TracingConfig::new()
            .with_level(level)
            .with_output(output.clone())
            .with_targets(targets);

        prop_assert_eq!(config.level, level);
        prop_assert_eq!(config.output, output);
        prop_assert_eq!(config.include_targets, targets);
        prop_assert!(config.filter.is_none());
    }

    /// The default directive names both crates at the configured level
    #[test]
    fn filter_directive_uses_level(level in arb_tracing_level()) {
        let directive = TracingConfig::new().with_level(level).filter_directive();
        prop_assert_eq!(directive, format!("jms_core={level},jms_handler={level}"));
    }

    /// A custom filter replaces the derived directive
    #[test]
    fn custom_filter_wins(level in arb_tracing_level(), filter in "[a-z_]{1,10}=(debug|info)") {
        let config = TracingConfig::new().with_level(level).with_filter(filter.clone());
        prop_assert_eq!(config.filter_directive(), filter);
    }

    /// Levels survive a Display/FromStr round trip, case-insensitively
    #[test]
    fn level_parses_from_display(level in arb_tracing_level(), upper in any::<bool>()) {
        let text = if upper { level.to_string().to_uppercase() } else { level.to_string() };
        prop_assert_eq!(text.parse::<TracingLevel>().unwrap(), level);
    }

    /// Without `-v` the base level is kept, with it the base is ignored
    #[test]
    fn verbosity_overrides_base(base in arb_tracing_level(), verbosity in 0u8..10) {
        let level = TracingLevel::from_verbosity(base, verbosity);
        match verbosity {
            0 => prop_assert_eq!(level, base),
            1 => prop_assert_eq!(level, TracingLevel::Info),
            2 => prop_assert_eq!(level, TracingLevel::Debug),
            _ => prop_assert_eq!(level, TracingLevel::Trace),
        }
    }
}

#[test]
fn test_unknown_level_is_rejected() {
    assert!("loud".parse::<TracingLevel>().is_err());
}
