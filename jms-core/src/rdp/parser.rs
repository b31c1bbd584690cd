//! Parser for the `key:type:value` directive format
//!
//! The same format is used by the `config` field of an RDP envelope and by
//! `.rdp` files. Parsing is strict: one malformed line rejects the whole
//! input.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{JmsError, JmsResult};

/// Type tag of a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdpValueType {
    /// `s`
    String,
    /// `i`
    Integer,
    /// `b`
    Binary,
}

impl RdpValueType {
    /// Parses a tag; only the exact single characters `s`, `i`, `b` are valid
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "s" => Some(Self::String),
            "i" => Some(Self::Integer),
            "b" => Some(Self::Binary),
            _ => None,
        }
    }

    /// The tag character
    #[must_use]
    pub const fn tag(self) -> char {
        match self {
            Self::String => 's',
            Self::Integer => 'i',
            Self::Binary => 'b',
        }
    }

    /// `i` for values that parse as a signed integer, `s` otherwise
    #[must_use]
    pub fn infer(value: &str) -> Self {
        if value.parse::<i64>().is_ok() {
            Self::Integer
        } else {
            Self::String
        }
    }
}

impl fmt::Display for RdpValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One parsed `key:type:value` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdpDirective {
    /// Key, surrounding whitespace removed
    pub key: String,
    /// Declared type tag
    pub value_type: RdpValueType,
    /// Everything after the second colon
    pub value: String,
}

impl RdpDirective {
    /// Creates a directive, inferring the type tag from the value
    #[must_use]
    pub fn inferred(key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            key: key.into(),
            value_type: RdpValueType::infer(&value),
            value,
        }
    }

    /// Creates an integer directive
    #[must_use]
    pub fn integer(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            value_type: RdpValueType::Integer,
            value: value.to_string(),
        }
    }

    /// Creates an integer directive holding `0` or `1`
    #[must_use]
    pub fn flag(key: impl Into<String>, value: bool) -> Self {
        Self::integer(key, u8::from(value))
    }

    /// Creates a string directive
    #[must_use]
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_type: RdpValueType::String,
            value: value.into(),
        }
    }
}

impl fmt::Display for RdpDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.key, self.value_type, self.value)
    }
}

/// Parses a single non-blank line. `line_number` is 1-based and only used in
/// the error.
///
/// # Errors
///
/// Returns [`JmsError::ConfigParsingFailed`] if the line has fewer than two
/// colons, an empty key, or a type tag other than `s`, `i` or `b`.
pub fn parse_directive(line: &str, line_number: usize) -> JmsResult<RdpDirective> {
    let fail = |reason: &str| JmsError::ConfigParsingFailed {
        line: line_number,
        reason: reason.to_string(),
    };

    let mut parts = line.trim().splitn(3, ':');
    let key = parts.next().unwrap_or_default().trim();
    let (Some(tag), Some(value)) = (parts.next(), parts.next()) else {
        return Err(fail("expected key:type:value"));
    };

    if key.is_empty() {
        return Err(fail("empty key"));
    }

    let value_type = RdpValueType::from_tag(tag)
        .ok_or_else(|| fail(&format!("invalid type tag '{tag}', expected s, i or b")))?;

    Ok(RdpDirective {
        key: key.to_string(),
        value_type,
        value: value.to_string(),
    })
}

/// Parses directive text into an ordered list, skipping blank lines.
///
/// # Errors
///
/// Returns the first [`JmsError::ConfigParsingFailed`] encountered.
pub fn parse_directives(text: &str) -> JmsResult<Vec<RdpDirective>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_directive(line, index + 1))
        .collect()
}

/// Parses directive text into a key to raw-value map.
///
/// Values are not coerced. A key that appears twice keeps its last value.
///
/// # Errors
///
/// Returns [`JmsError::ConfigParsingFailed`] if any non-blank line is
/// malformed; nothing is returned for the lines that were valid.
pub fn parse_config_string(text: &str) -> JmsResult<BTreeMap<String, String>> {
    let directives = parse_directives(text).inspect_err(|e| {
        tracing::warn!(error_kind = %e.kind(), "RDP config rejected");
    })?;

    let map: BTreeMap<String, String> = directives
        .into_iter()
        .map(|directive| (directive.key, directive.value))
        .collect();

    tracing::debug!(keys = map.len(), "RDP config parsed");
    Ok(map)
}
