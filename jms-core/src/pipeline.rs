//! End-to-end `jms://` handling
//!
//! [`ProtocolHandler`] runs the stages in order and stops at the first
//! error:
//!
//! ```text
//! URL -> payload -> envelope -> connection info -> artifact
//! ```
//!
//! The handler only holds immutable configuration. Every call builds fresh
//! records, so one handler can serve any number of URLs, concurrently if the
//! display provider allows it.

use std::fmt;

use crate::error::JmsResult;
use crate::extract::extract_connection_info;
use crate::jms_url::parse_url;
use crate::models::{
    ConnectionInfo, DisplayProvider, JmsConfig, QualityProfile, RdpConnectionInfo,
    StaticDisplayProvider,
};
use crate::payload::decode_payload;
use crate::rdp::{RdpDisplaySettings, render_rdp};
use crate::ssh::{SshRenderOptions, render_ssh};

/// What a URL turns into
#[derive(Clone, PartialEq, Eq)]
pub enum LaunchArtifact {
    /// `.rdp` file contents
    Rdp {
        /// Envelope `filename`, unsanitised
        filename: String,
        /// File body
        content: String,
    },
    /// Shell command to run in a terminal
    Ssh {
        /// The command, possibly embedding the password
        command: String,
    },
}

impl LaunchArtifact {
    /// `rdp` or `ssh`
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rdp { .. } => "rdp",
            Self::Ssh { .. } => "ssh",
        }
    }
}

impl fmt::Debug for LaunchArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rdp { filename, content } => f
                .debug_struct("Rdp")
                .field("filename", filename)
                .field("lines", &content.lines().count())
                .finish(),
            Self::Ssh { command } => f
                .debug_struct("Ssh")
                .field("command_len", &command.len())
                .finish(),
        }
    }
}

/// Decoded envelope together with the connection info built from it
#[derive(Debug, Clone)]
pub struct ResolvedUrl {
    /// The envelope
    pub config: JmsConfig,
    /// Validated connection info
    pub info: ConnectionInfo,
}

/// Runs the pipeline with a display provider and rendering options
#[derive(Debug, Clone)]
pub struct ProtocolHandler<D: DisplayProvider = StaticDisplayProvider> {
    display: D,
    profile: QualityProfile,
    ssh_options: SshRenderOptions,
}

impl Default for ProtocolHandler {
    fn default() -> Self {
        Self::new(StaticDisplayProvider::default())
    }
}

impl<D: DisplayProvider> ProtocolHandler<D> {
    /// Balanced profile, bare SSH commands
    #[must_use]
    pub fn new(display: D) -> Self {
        Self {
            display,
            profile: QualityProfile::default(),
            ssh_options: SshRenderOptions::default(),
        }
    }

    /// Sets the quality profile
    #[must_use]
    pub fn with_profile(mut self, profile: QualityProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets the SSH rendering options
    #[must_use]
    pub fn with_ssh_options(mut self, options: SshRenderOptions) -> Self {
        self.ssh_options = options;
        self
    }

    /// The configured quality profile
    #[must_use]
    pub const fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    /// Validates the URL and decodes its envelope.
    ///
    /// # Errors
    ///
    /// Any URL or payload error.
    pub fn decode_url(&self, url: &str) -> JmsResult<JmsConfig> {
        let _span = tracing::debug_span!(crate::tracing::span_names::PAYLOAD_DECODE).entered();
        let components = parse_url(url).inspect_err(|e| {
            tracing::warn!(error_kind = %e.kind(), "URL rejected");
        })?;
        tracing::debug!(payload_len = components.payload_len(), "URL accepted");
        decode_payload(&components.encoded_payload)
    }

    /// Decodes the URL and extracts connection info, without rendering.
    ///
    /// # Errors
    ///
    /// Any URL, payload or extraction error.
    pub fn resolve(&self, url: &str) -> JmsResult<ResolvedUrl> {
        let config = self.decode_url(url)?;
        let info = tracing::debug_span!(
            crate::tracing::span_names::EXTRACT,
            protocol = %config.protocol
        )
        .in_scope(|| extract_connection_info(&config))?;
        Ok(ResolvedUrl { config, info })
    }

    /// Runs every stage and returns the artifact.
    ///
    /// # Errors
    ///
    /// The first error any stage produces; nothing partial is returned.
    pub fn handle_url(&self, url: &str) -> JmsResult<LaunchArtifact> {
        let _span = tracing::info_span!(crate::tracing::span_names::HANDLE_URL).entered();
        let resolved = self.resolve(url)?;
        let artifact = self.render(&resolved)?;
        tracing::info!(
            protocol = artifact.kind(),
            profile = self.profile.identifier(),
            "Artifact ready"
        );
        Ok(artifact)
    }

    /// Renders resolved connection info.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::JmsError::DisplayDetectionFailed`] if RDP
    /// settings are needed and the display provider fails.
    pub fn render(&self, resolved: &ResolvedUrl) -> JmsResult<LaunchArtifact> {
        let _span = tracing::debug_span!(
            crate::tracing::span_names::RENDER,
            protocol = %resolved.info.protocol()
        )
        .entered();
        match &resolved.info {
            ConnectionInfo::Rdp(info) => Ok(LaunchArtifact::Rdp {
                filename: resolved.config.filename.clone(),
                content: self.render_rdp(info)?,
            }),
            ConnectionInfo::Ssh(info) => Ok(LaunchArtifact::Ssh {
                command: render_ssh(info, &self.ssh_options),
            }),
        }
    }

    /// Display settings for the current display and profile.
    ///
    /// # Errors
    ///
    /// Propagates display provider failures.
    pub fn display_settings(&self) -> JmsResult<RdpDisplaySettings> {
        let display = self.display.primary_display().inspect_err(|e| {
            tracing::warn!(error_kind = %e.kind(), "Display detection failed");
        })?;
        let settings = RdpDisplaySettings::for_profile(&self.profile, &display);
        if let Err(e) = settings.validate() {
            // the RDP client clamps out-of-range values itself
            tracing::warn!(error = %e, "Derived display settings out of range");
        }
        Ok(settings)
    }

    fn render_rdp(&self, info: &RdpConnectionInfo) -> JmsResult<String> {
        Ok(render_rdp(info, &self.display_settings()?))
    }
}
