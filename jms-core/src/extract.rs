//! Connection-info extraction
//!
//! Decides what a decoded envelope describes and whether it is complete
//! enough to act on. Required fields fail hard with
//! [`JmsError::MissingConnectionInfo`]; the optional RDP fields are coerced
//! on a best-effort basis and become `None` when they do not parse.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::error::{JmsError, JmsResult};
use crate::models::{ConnectionInfo, JmsConfig, Protocol, RdpConnectionInfo, SshConnectionInfo};
use crate::rdp::parse_config_string;

/// RDP keys with a dedicated field in [`RdpConnectionInfo`]
pub const RECOGNIZED_RDP_KEYS: [&str; 6] = [
    "full address",
    "username",
    "session bpp",
    "audiomode",
    "smart sizing",
    "screen mode id",
];

/// Builds protocol-specific connection info from an envelope.
///
/// # Errors
///
/// - [`JmsError::UnsupportedProtocol`] if `protocol` is not `rdp` or `ssh`
/// - [`JmsError::ConfigParsingFailed`] if the RDP config text is malformed
/// - [`JmsError::JsonParsingFailed`] if the SSH token is not a JSON object
/// - [`JmsError::MissingConnectionInfo`] if a required field is absent,
///   empty or, for the SSH port, not a positive integer
pub fn extract_connection_info(config: &JmsConfig) -> JmsResult<ConnectionInfo> {
    let result = config.protocol_type().and_then(|protocol| match protocol {
        Protocol::Rdp => extract_rdp(&config.config).map(ConnectionInfo::Rdp),
        Protocol::Ssh => extract_ssh(&config.token, &config.filename).map(ConnectionInfo::Ssh),
    });

    match &result {
        Ok(info) => tracing::debug!(protocol = %info.protocol(), "Connection info extracted"),
        Err(e) => tracing::warn!(
            protocol = %config.protocol,
            error_kind = %e.kind(),
            "Connection info rejected"
        ),
    }
    result
}

/// Builds RDP connection info from directive text.
///
/// # Errors
///
/// See [`extract_connection_info`].
pub fn extract_rdp(config_text: &str) -> JmsResult<RdpConnectionInfo> {
    let map = parse_config_string(config_text)?;
    rdp_info_from_map(map)
}

/// Builds RDP connection info from an already parsed directive map.
///
/// # Errors
///
/// Returns [`JmsError::MissingConnectionInfo`] if `full address` or
/// `username` is absent or empty.
pub fn rdp_info_from_map(mut map: BTreeMap<String, String>) -> JmsResult<RdpConnectionInfo> {
    let full_address = take_required(&mut map, "full address")?;
    let username = take_required(&mut map, "username")?;

    let session_bpp = map.remove("session bpp").and_then(|v| parse_int(&v));
    let audio_mode = map.remove("audiomode").and_then(|v| parse_int(&v));
    let screen_mode_id = map.remove("screen mode id").and_then(|v| parse_int(&v));
    let smart_sizing = map.remove("smart sizing").and_then(|v| parse_bool(&v));

    tracing::debug!(
        host = %full_address,
        username = %username,
        additional = map.len(),
        "RDP connection info built"
    );

    Ok(RdpConnectionInfo {
        full_address,
        username,
        session_bpp,
        audio_mode,
        smart_sizing,
        screen_mode_id,
        additional_config: map,
    })
}

fn take_required(map: &mut BTreeMap<String, String>, key: &str) -> JmsResult<String> {
    map.remove(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| JmsError::MissingConnectionInfo(format!("RDP config lacks '{key}'")))
}

/// Lenient integer coercion for optional fields
#[must_use]
pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// Lenient boolean coercion: `0`/`1`, or `true`/`false`/`yes`/`no` in any case
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Builds SSH connection info from the nested JSON token.
///
/// `port` may be a JSON string or number; it is normalised to the decimal
/// form of a positive integer.
///
/// # Errors
///
/// See [`extract_connection_info`].
pub fn extract_ssh(token: &str, filename: &str) -> JmsResult<SshConnectionInfo> {
    if token.trim().is_empty() {
        return Err(JmsError::MissingConnectionInfo(
            "SSH token is empty".to_string(),
        ));
    }

    let value: Value = serde_json::from_str(token)
        .map_err(|e| JmsError::JsonParsingFailed(format!("SSH token: {e}")))?;
    let Value::Object(object) = value else {
        return Err(JmsError::JsonParsingFailed(
            "SSH token is not a JSON object".to_string(),
        ));
    };

    let ip = token_string(&object, "ip")?;
    let port = token_port(&object)?;
    let username = token_string(&object, "username")?;
    let password = token_string(&object, "password")?;

    tracing::debug!(host = %ip, port = %port, username = %username, "SSH connection info built");

    Ok(SshConnectionInfo {
        ip,
        port,
        username,
        password: SecretString::from(password),
        filename: filename.to_string(),
    })
}

fn token_string(object: &Map<String, Value>, key: &str) -> JmsResult<String> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(JmsError::MissingConnectionInfo(format!(
            "SSH token lacks '{key}'"
        ))),
    }
}

fn token_port(object: &Map<String, Value>) -> JmsResult<String> {
    let port = match object.get("port") {
        Some(Value::String(s)) => s.trim().parse::<u16>().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    };

    port.filter(|&p| p > 0)
        .map(|p| p.to_string())
        .ok_or_else(|| {
            JmsError::MissingConnectionInfo("SSH token lacks a valid 'port'".to_string())
        })
}
