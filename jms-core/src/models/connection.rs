//! Connection records produced by the extractor
//!
//! [`JmsConfig`] is the decoded envelope. [`RdpConnectionInfo`] and
//! [`SshConnectionInfo`] are the validated, protocol-specific records built
//! from it and consumed by the serializers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::JmsError;

/// Default RDP port when `full address` carries none
pub const DEFAULT_RDP_PORT: u16 = 3389;

/// Protocols a `jms://` payload can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Remote Desktop Protocol
    Rdp,
    /// Secure Shell
    Ssh,
}

impl Protocol {
    /// Lower-case wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rdp => "rdp",
            Self::Ssh => "ssh",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = JmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rdp" => Ok(Self::Rdp),
            "ssh" => Ok(Self::Ssh),
            _ => Err(JmsError::UnsupportedProtocol(s.to_string())),
        }
    }
}

/// The decoded `jms://` envelope.
///
/// All five fields are non-empty once [`crate::payload::decode_payload`] has
/// returned it. `token` carries credentials and is never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct JmsConfig {
    /// Suggested artifact name
    pub filename: String,
    /// Protocol discriminator, matched case-insensitively
    pub protocol: String,
    /// Account name on the bastion
    pub username: String,
    /// Opaque token; nested JSON for SSH
    pub token: String,
    /// RDP `key:type:value` directives
    pub config: String,
}

impl JmsConfig {
    /// Resolves the protocol discriminator.
    ///
    /// # Errors
    ///
    /// Returns [`JmsError::UnsupportedProtocol`] for anything but `rdp`/`ssh`.
    pub fn protocol_type(&self) -> Result<Protocol, JmsError> {
        self.protocol.parse()
    }
}

impl fmt::Debug for JmsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JmsConfig")
            .field("filename", &self.filename)
            .field("protocol", &self.protocol)
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .field("config_len", &self.config.len())
            .finish()
    }
}

/// Validated RDP connection parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RdpConnectionInfo {
    /// `host` or `host:port`
    pub full_address: String,
    /// Login name passed to the RDP client
    pub username: String,
    /// `session bpp`, if present and numeric
    pub session_bpp: Option<i32>,
    /// `audiomode`, if present and numeric
    pub audio_mode: Option<i32>,
    /// `smart sizing`, if present and boolean-like
    pub smart_sizing: Option<bool>,
    /// `screen mode id`, if present and numeric
    pub screen_mode_id: Option<i32>,
    /// Every other directive, raw value by key
    pub additional_config: BTreeMap<String, String>,
}

impl RdpConnectionInfo {
    /// Creates connection info with only the required fields set
    #[must_use]
    pub fn new(full_address: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            full_address: full_address.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// Host part of `full_address`
    #[must_use]
    pub fn hostname(&self) -> &str {
        self.full_address
            .rsplit_once(':')
            .filter(|(_, port)| port.parse::<u16>().is_ok())
            .map_or(self.full_address.as_str(), |(host, _)| host)
    }

    /// Port part of `full_address`, or 3389
    #[must_use]
    pub fn port(&self) -> u16 {
        self.full_address
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse().ok())
            .unwrap_or(DEFAULT_RDP_PORT)
    }
}

/// Validated SSH connection parameters from the nested token
#[derive(Debug, Clone)]
pub struct SshConnectionInfo {
    /// Server address
    pub ip: String,
    /// Port in canonical decimal form, always a positive integer
    pub port: String,
    /// Login name
    pub username: String,
    /// Login password
    pub password: SecretString,
    /// Envelope `filename`, used to label the session
    pub filename: String,
}

impl SshConnectionInfo {
    /// Numeric port. Always succeeds for extractor-built records.
    #[must_use]
    pub fn port_number(&self) -> Option<u16> {
        self.port.parse().ok()
    }

    /// `username@ip`
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.username, self.ip)
    }
}

/// Extractor output, one variant per protocol
#[derive(Debug, Clone)]
pub enum ConnectionInfo {
    /// RDP connection
    Rdp(RdpConnectionInfo),
    /// SSH connection
    Ssh(SshConnectionInfo),
}

impl ConnectionInfo {
    /// Protocol of this record
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        match self {
            Self::Rdp(_) => Protocol::Rdp,
            Self::Ssh(_) => Protocol::Ssh,
        }
    }
}
