//! CLI error types and exit codes.

use jms_core::error::{ConfigError, JmsError, JmsErrorKind, LaunchError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, arguments or IO
    pub const GENERAL_ERROR: i32 = 1;
    /// The URL or its payload was rejected
    pub const PAYLOAD_REJECTED: i32 = 2;
    /// The artifact was built but could not be launched
    pub const LAUNCH_FAILURE: i32 = 3;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The pipeline rejected the URL
    #[error(transparent)]
    Payload(#[from] JmsError),

    /// Launching failed
    #[error("Launch failed: {0}")]
    Launch(#[from] LaunchError),

    /// Output error
    #[error("Output error: {0}")]
    Output(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, arguments, IO)
    /// - 2: URL or payload rejected
    /// - 3: Launch failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Payload(_) => exit_codes::PAYLOAD_REJECTED,
            Self::Launch(_) => exit_codes::LAUNCH_FAILURE,
            Self::Config(_) | Self::InvalidArgument(_) | Self::Output(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }

    /// What the user can do about the error, if anything
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Payload(err) => Some(payload_suggestion(err.kind())),
            Self::Launch(LaunchError::TerminalNotFound) => Some(
                "Install iTerm2 or Terminal.app, or run with --dry-run to print the SSH command",
            ),
            Self::Launch(LaunchError::SpawnFailed { .. }) => {
                Some("Check the `opener` setting in the [rdp] section of the configuration file")
            }
            Self::Config(_) => Some("Run `jms-handler config path` to locate the settings file"),
            _ => None,
        }
    }
}

const fn payload_suggestion(kind: JmsErrorKind) -> &'static str {
    match kind {
        JmsErrorKind::InvalidUrl | JmsErrorKind::DecodingFailed => {
            "The link looks truncated. Open the connection again from the JumpServer web console"
        }
        JmsErrorKind::JsonParsingFailed | JmsErrorKind::MissingRequiredField => {
            "The link payload is incomplete. Request a new connection link"
        }
        JmsErrorKind::ConfigParsingFailed => {
            "The RDP settings in the link are malformed. Contact your JumpServer administrator"
        }
        JmsErrorKind::MissingConnectionInfo => {
            "The link lacks host or account details. Request a new connection link"
        }
        JmsErrorKind::UnsupportedProtocol => "Only RDP and SSH connections are supported",
        JmsErrorKind::DisplayDetectionFailed => {
            "Set width and height in the [display] section of the configuration file"
        }
    }
}
