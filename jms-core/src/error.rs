//! Error types for the `jms://` handler
//!
//! [`JmsError`] is the pipeline taxonomy: every stage from URL validation to
//! connection-info extraction returns it and aborts on the first failure.
//! [`ConfigError`] and [`LaunchError`] cover the configuration store and the
//! launcher, and [`HandlerError`] wraps all three for callers that drive the
//! whole flow.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the decoding and extraction pipeline.
///
/// Every variant is terminal: the pipeline never retries and never returns a
/// partial result once one of these has been produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JmsError {
    /// Wrong scheme, or an empty / malformed base64 payload segment
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Base64 decoding failed on an otherwise well-formed payload
    #[error("Payload decoding failed: {0}")]
    DecodingFailed(String),

    /// JSON is invalid or does not have the expected shape
    #[error("JSON parsing failed: {0}")]
    JsonParsingFailed(String),

    /// One of the five envelope fields is absent or empty
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// An RDP config line is not a valid `key:type:value` directive
    #[error("Config parsing failed at line {line}: {reason}")]
    ConfigParsingFailed {
        /// 1-based line number within the config string
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Protocol-specific connection fields are absent or invalid
    #[error("Missing connection info: {0}")]
    MissingConnectionInfo(String),

    /// The envelope names a protocol other than `rdp` or `ssh`
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// The display-characteristics provider could not describe a display
    #[error("Display detection failed: {0}")]
    DisplayDetectionFailed(String),
}

/// Fieldless discriminant of [`JmsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JmsErrorKind {
    /// See [`JmsError::InvalidUrl`]
    InvalidUrl,
    /// See [`JmsError::DecodingFailed`]
    DecodingFailed,
    /// See [`JmsError::JsonParsingFailed`]
    JsonParsingFailed,
    /// See [`JmsError::MissingRequiredField`]
    MissingRequiredField,
    /// See [`JmsError::ConfigParsingFailed`]
    ConfigParsingFailed,
    /// See [`JmsError::MissingConnectionInfo`]
    MissingConnectionInfo,
    /// See [`JmsError::UnsupportedProtocol`]
    UnsupportedProtocol,
    /// See [`JmsError::DisplayDetectionFailed`]
    DisplayDetectionFailed,
}

impl JmsError {
    /// Returns the kind of this error without its message
    #[must_use]
    pub const fn kind(&self) -> JmsErrorKind {
        match self {
            Self::InvalidUrl(_) => JmsErrorKind::InvalidUrl,
            Self::DecodingFailed(_) => JmsErrorKind::DecodingFailed,
            Self::JsonParsingFailed(_) => JmsErrorKind::JsonParsingFailed,
            Self::MissingRequiredField(_) => JmsErrorKind::MissingRequiredField,
            Self::ConfigParsingFailed { .. } => JmsErrorKind::ConfigParsingFailed,
            Self::MissingConnectionInfo(_) => JmsErrorKind::MissingConnectionInfo,
            Self::UnsupportedProtocol(_) => JmsErrorKind::UnsupportedProtocol,
            Self::DisplayDetectionFailed(_) => JmsErrorKind::DisplayDetectionFailed,
        }
    }
}

impl std::fmt::Display for JmsErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidUrl => "invalid_url",
            Self::DecodingFailed => "decoding_failed",
            Self::JsonParsingFailed => "json_parsing_failed",
            Self::MissingRequiredField => "missing_required_field",
            Self::ConfigParsingFailed => "config_parsing_failed",
            Self::MissingConnectionInfo => "missing_connection_info",
            Self::UnsupportedProtocol => "unsupported_protocol",
            Self::DisplayDetectionFailed => "display_detection_failed",
        };
        f.write_str(name)
    }
}

/// Result type for pipeline operations
pub type JmsResult<T> = std::result::Result<T, JmsError>;

/// Errors from loading, validating or saving handler configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    #[error("Failed to access config file {path}: {source}")]
    Io {
        /// The file that could not be accessed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the settings schema
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Failed to serialize settings
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// Settings parsed but hold out-of-range values
    #[error("Invalid setting: {0}")]
    Invalid(String),

    /// No configuration directory could be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors from handing an artifact to an external application
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Writing the artifact file failed
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        /// Target path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The external program could not be started
    #[error("Failed to start {program}: {source}")]
    SpawnFailed {
        /// Program name
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The external program ran but reported failure
    #[error("{program} exited with status {status}")]
    ProgramFailed {
        /// Program name
        program: String,
        /// Exit status description
        status: String,
    },

    /// No terminal application is available for SSH sessions
    #[error("No supported terminal application found")]
    TerminalNotFound,
}

/// Result type for launch operations
pub type LaunchResult<T> = std::result::Result<T, LaunchError>;

/// Umbrella error for callers that run the whole handler flow
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Pipeline error
    #[error(transparent)]
    Jms(#[from] JmsError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Launch error
    #[error(transparent)]
    Launch(#[from] LaunchError),
}
