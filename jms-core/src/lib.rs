//! JMS Handler Core Library
//!
//! Turns `jms://` URLs from a JumpServer web console into something a local
//! client can open: an `.rdp` file for RDP, or a shell command for SSH.
//!
//! # Crate Structure
//!
//! - [`jms_url`] - URL validation and payload extraction
//! - [`payload`] - Base64 decoding and envelope parsing
//! - [`rdp`] - RDP `key:type:value` parsing, display settings and serialization
//! - [`extract`] - Connection info extraction per protocol
//! - [`ssh`] - SSH command rendering, with optional `expect` automation
//! - [`pipeline`] - [`ProtocolHandler`], the stages wired together
//! - [`launch`] - Handing artifacts to the operating system
//! - [`detection`] - Terminal, `expect` and RDP client discovery
//! - [`config`] - Settings file and persistence
//! - [`models`] - Shared records (envelope, connection info, display, quality)
//! - [`tracing`] - Logging setup

#![warn(missing_docs)]

pub mod config;
pub mod detection;
pub mod error;
pub mod extract;
pub mod jms_url;
pub mod launch;
pub mod models;
pub mod payload;
pub mod pipeline;
pub mod rdp;
pub mod ssh;
pub mod tracing;

pub use config::{ConfigManager, HandlerSettings};
pub use detection::{ClientInfo, TerminalApp, TerminalCapabilities};
pub use error::{
    ConfigError, ConfigResult, HandlerError, JmsError, JmsErrorKind, JmsResult, LaunchError,
    LaunchResult,
};
pub use extract::extract_connection_info;
pub use jms_url::{JMS_SCHEME, JmsUrlComponents, is_jms_url, is_valid_base64, parse_url};
pub use launch::{LaunchOutcome, Launcher, RecordingLauncher, SystemLauncher};
pub use models::{
    ConnectionInfo, DisplayConfiguration, DisplayProvider, JmsConfig, Protocol, QualityProfile,
    RdpConnectionInfo, RdpQualitySettings, SshConnectionInfo, StaticDisplayProvider,
};
pub use payload::{decode_base64, decode_payload, parse_envelope};
pub use pipeline::{LaunchArtifact, ProtocolHandler, ResolvedUrl};
pub use rdp::{RdpDisplaySettings, parse_config_string, render_rdp};
pub use ssh::{SshRenderOptions, render_ssh};
