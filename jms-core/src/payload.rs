//! Envelope decoding
//!
//! Turns the base64 payload of a `jms://` URL into a [`JmsConfig`]. The
//! envelope is parsed into a generic JSON value first so that an absent or
//! empty field can be reported by name, separately from a structurally
//! broken document.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

use crate::error::{JmsError, JmsResult};
use crate::models::JmsConfig;

/// Envelope fields in the order they are checked
pub const ENVELOPE_FIELDS: [&str; 5] = ["filename", "protocol", "username", "token", "config"];

/// Standard alphabet with canonical padding.
///
/// Trailing bits in the last symbol are tolerated so that every payload that
/// passes [`crate::jms_url::is_valid_base64`] decodes to some byte string.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes standard base64 into raw bytes.
///
/// # Errors
///
/// Returns [`JmsError::DecodingFailed`] if `payload` is not base64.
pub fn decode_base64(payload: &str) -> JmsResult<Vec<u8>> {
    PAYLOAD_ENGINE
        .decode(payload.trim())
        .map_err(|e| JmsError::DecodingFailed(e.to_string()))
}

/// Decodes a payload into the five-field envelope.
///
/// # Errors
///
/// - [`JmsError::DecodingFailed`] if the payload is not base64
/// - [`JmsError::JsonParsingFailed`] if the bytes are not a JSON object, or
///   a field holds something other than a string
/// - [`JmsError::MissingRequiredField`] naming the first absent, null or
///   empty field, in [`ENVELOPE_FIELDS`] order
pub fn decode_payload(payload: &str) -> JmsResult<JmsConfig> {
    let bytes = decode_base64(payload).inspect_err(|e| {
        tracing::warn!(error_kind = %e.kind(), "Payload is not base64");
    })?;

    let config = parse_envelope(&bytes).inspect_err(|e| {
        tracing::warn!(error_kind = %e.kind(), "Envelope rejected");
    })?;

    tracing::debug!(
        protocol = %config.protocol,
        filename = %config.filename,
        "Envelope decoded"
    );
    Ok(config)
}

/// Parses decoded bytes as the JSON envelope.
///
/// # Errors
///
/// See [`decode_payload`]; never returns [`JmsError::DecodingFailed`].
pub fn parse_envelope(bytes: &[u8]) -> JmsResult<JmsConfig> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| JmsError::JsonParsingFailed(e.to_string()))?;

    let Value::Object(object) = value else {
        return Err(JmsError::JsonParsingFailed(
            "envelope is not a JSON object".to_string(),
        ));
    };

    let [filename, protocol, username, token, config] =
        ENVELOPE_FIELDS.map(|name| required_string(&object, name));

    Ok(JmsConfig {
        filename: filename?,
        protocol: protocol?,
        username: username?,
        token: token?,
        config: config?,
    })
}

fn required_string(object: &Map<String, Value>, name: &str) -> JmsResult<String> {
    match object.get(name) {
        None | Some(Value::Null) => Err(JmsError::MissingRequiredField(name.to_string())),
        Some(Value::String(s)) if s.is_empty() => {
            Err(JmsError::MissingRequiredField(name.to_string()))
        }
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(JmsError::JsonParsingFailed(format!(
            "field '{name}' must be a string, found {}",
            json_type_name(other)
        ))),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Encodes raw bytes with the payload alphabet
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    PAYLOAD_ENGINE.encode(bytes)
}
