//! Property tests for RDP `key:type:value` parsing

use std::collections::BTreeMap;

use jms_core::extract::extract_rdp;
use jms_core::rdp::{
    RdpDirective, RdpDisplaySettings, RdpValueType, parse_config_string, parse_directives,
    render_rdp,
};
use jms_core::{JmsError, JmsErrorKind};
use proptest::prelude::*;

// ========== Strategies ==========

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z ]{0,18}[a-z]"
}

fn arb_value_type() -> impl Strategy<Value = RdpValueType> {
    prop_oneof![
        Just(RdpValueType::String),
        Just(RdpValueType::Integer),
        Just(RdpValueType::Binary),
    ]
}

/// Values may contain colons, but never line breaks or edge whitespace
fn arb_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9.:_@-]{0,30}"
}

fn arb_directive() -> impl Strategy<Value = RdpDirective> {
    (arb_key(), arb_value_type(), arb_value()).prop_map(|(key, value_type, value)| RdpDirective {
        key,
        value_type,
        value,
    })
}

/// Keys lifted into typed connection fields during extraction
const RECOGNIZED_KEYS: &[&str] = &[
    "full address",
    "username",
    "session bpp",
    "audiomode",
    "screen mode id",
    "smart sizing",
];

fn arb_full_address() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,15}:[0-9]{2,5}"
}

fn arb_username() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9._-]{0,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rendered directives parse back to the same key, tag and value
    #[test]
    fn rendered_directives_parse_back(directives in prop::collection::vec(arb_directive(), 0..12)) {
        let text = directives
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let parsed = parse_directives(&text).unwrap();
        prop_assert_eq!(parsed, directives);
    }

    /// The map keeps the last value written for each key
    #[test]
    fn map_keeps_last_value(directives in prop::collection::vec(arb_directive(), 0..12)) {
        let text = directives
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let mut expected = BTreeMap::new();
        for directive in &directives {
            expected.insert(directive.key.clone(), directive.value.clone());
        }
        prop_assert_eq!(parse_config_string(&text).unwrap(), expected);
    }

    /// Blank lines between directives change nothing
    #[test]
    fn blank_lines_are_ignored(directives in prop::collection::vec(arb_directive(), 1..8)) {
        let dense = directives
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        let sparse = directives
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n  \n\n");
        prop_assert_eq!(
            parse_config_string(&dense).unwrap(),
            parse_config_string(&sparse).unwrap()
        );
    }

    /// A malformed line fails the whole input and reports its line number
    #[test]
    fn malformed_line_reports_position(
        before in prop::collection::vec(arb_directive(), 0..6),
        garbage in "[a-z ]{1,20}",
    ) {
        prop_assume!(!garbage.trim().is_empty());
        let mut lines: Vec<String> = before.iter().map(ToString::to_string).collect();
        lines.push(garbage);
        let err = parse_config_string(&lines.join("\n")).unwrap_err();
        prop_assert_eq!(err.kind(), JmsErrorKind::ConfigParsingFailed);
        let JmsError::ConfigParsingFailed { line, .. } = err else {
            unreachable!();
        };
        prop_assert_eq!(line, lines.len());
    }

    /// Tags other than s, i and b are refused
    #[test]
    fn unknown_tags_are_rejected(key in arb_key(), tag in "[a-hj-rt-z]", value in arb_value()) {
        prop_assume!(tag != "b");
        let err = parse_config_string(&format!("{key}:{tag}:{value}")).unwrap_err();
        prop_assert_eq!(err.kind(), JmsErrorKind::ConfigParsingFailed);
    }

    /// Parsing the rendered file of an extracted config gives back the
    /// address, the username and every additional directive, with type tags
    /// normalised from the value
    #[test]
    fn extracted_config_round_trips_through_render(
        full_address in arb_full_address(),
        username in arb_username(),
        extras in prop::collection::vec(arb_directive(), 0..10),
    ) {
        let extras: Vec<RdpDirective> = extras
            .into_iter()
            .filter(|directive| !RECOGNIZED_KEYS.contains(&directive.key.as_str()))
            .collect();

        let mut lines = vec![
            format!("full address:s:{full_address}"),
            format!("username:s:{username}"),
        ];
        lines.extend(extras.iter().map(ToString::to_string));

        let info = extract_rdp(&lines.join("\n")).unwrap();
        let rendered = render_rdp(&info, &RdpDisplaySettings::default());
        let directives = parse_directives(&rendered).unwrap();
        let map = parse_config_string(&rendered).unwrap();

        prop_assert_eq!(directives.len(), map.len(), "duplicate keys in {}", rendered);
        prop_assert_eq!(&map["full address"], &full_address);
        prop_assert_eq!(&map["username"], &username);

        let mut expected = BTreeMap::new();
        for directive in &extras {
            expected.insert(directive.key.clone(), directive.value.clone());
        }
        for (key, value) in &expected {
            prop_assert_eq!(&map[key], value);
            let written = directives.iter().find(|d| &d.key == key).unwrap();
            prop_assert_eq!(written.value_type, RdpValueType::infer(value));
        }
    }
}
