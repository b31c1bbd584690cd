//! Handing artifacts to external applications
//!
//! The pipeline stops at a [`LaunchArtifact`]. A [`Launcher`] takes it from
//! there: [`SystemLauncher`] writes `.rdp` files and opens them, or opens a
//! terminal through AppleScript for SSH commands. [`RecordingLauncher`]
//! only remembers what it was given.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::config::HandlerSettings;
use crate::detection::TerminalApp;
use crate::error::{LaunchError, LaunchResult};
use crate::pipeline::LaunchArtifact;

/// Result of a successful launch
#[derive(Debug)]
pub struct LaunchOutcome {
    /// Human-readable summary
    pub description: String,
    /// File written for the launch, if any
    pub file: Option<PathBuf>,
    cleanup: Option<JoinHandle<()>>,
}

impl LaunchOutcome {
    /// Outcome without a file
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            file: None,
            cleanup: None,
        }
    }

    /// Whether a deletion is pending for the written file
    #[must_use]
    pub const fn has_pending_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Waits until the written file has been removed.
    ///
    /// A short-lived process must call this before exiting, otherwise the
    /// file is left behind.
    pub async fn wait_for_cleanup(self) {
        if let Some(handle) = self.cleanup
            && let Err(e) = handle.await
        {
            tracing::warn!(error = %e, "Cleanup task failed");
        }
    }
}

/// Something that can act on a [`LaunchArtifact`]
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Launches the artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] if the artifact cannot be handed over.
    async fn launch(&self, artifact: &LaunchArtifact) -> LaunchResult<LaunchOutcome>;
}

/// Launcher backed by the operating system
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    opener: String,
    opener_args: Vec<String>,
    output_dir: PathBuf,
    cleanup_delay: Duration,
    terminal: Option<TerminalApp>,
}

impl SystemLauncher {
    /// Writes into `output_dir` and opens files with the platform opener
    #[must_use]
    pub fn new(output_dir: PathBuf) -> Self {
        let defaults = crate::config::RdpSettings::default();
        Self {
            opener: defaults.opener,
            opener_args: defaults.opener_args,
            output_dir,
            cleanup_delay: Duration::from_secs(defaults.cleanup_delay),
            terminal: None,
        }
    }

    /// Builds a launcher from settings and a detected terminal
    #[must_use]
    pub fn from_settings(settings: &HandlerSettings, terminal: Option<TerminalApp>) -> Self {
        let output_dir = settings
            .rdp
            .output_dir
            .clone()
            .unwrap_or_else(default_output_dir);
        Self::new(output_dir)
            .with_opener(settings.rdp.opener.clone(), settings.rdp.opener_args.clone())
            .with_cleanup_delay(Duration::from_secs(settings.rdp.cleanup_delay))
            .with_terminal(terminal)
    }

    /// Sets the program used to open `.rdp` files
    #[must_use]
    pub fn with_opener(mut self, opener: impl Into<String>, args: Vec<String>) -> Self {
        self.opener = opener.into();
        self.opener_args = args;
        self
    }

    /// Sets the delay before written files are removed
    #[must_use]
    pub const fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    /// Sets the terminal for SSH sessions
    #[must_use]
    pub const fn with_terminal(mut self, terminal: Option<TerminalApp>) -> Self {
        self.terminal = terminal;
        self
    }

    /// Directory `.rdp` files are written to
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `<sanitised filename>.rdp` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::WriteFailed`] if the directory or file cannot
    /// be written.
    pub async fn write_rdp_file(&self, filename: &str, content: &str) -> LaunchResult<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| LaunchError::WriteFailed {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self
            .output_dir
            .join(format!("{}.rdp", sanitize_filename(filename)));
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| LaunchError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "RDP file written");
        Ok(path)
    }

    async fn launch_rdp(&self, filename: &str, content: &str) -> LaunchResult<LaunchOutcome> {
        let path = self.write_rdp_file(filename, content).await?;

        let mut args = self.opener_args.clone();
        args.push(path.to_string_lossy().into_owned());
        if let Err(e) = run_program(&self.opener, &args).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }

        let cleanup = schedule_cleanup(path.clone(), self.cleanup_delay);
        Ok(LaunchOutcome {
            description: format!("Opened {} with {}", path.display(), self.opener),
            file: Some(path),
            cleanup: Some(cleanup),
        })
    }

    async fn launch_ssh(&self, command: &str) -> LaunchResult<LaunchOutcome> {
        let terminal = self.terminal.ok_or(LaunchError::TerminalNotFound)?;
        let script = terminal_script(terminal, command);
        run_program("osascript", &["-e".to_string(), script]).await?;
        Ok(LaunchOutcome::new(format!(
            "Started SSH session in {terminal}"
        )))
    }
}

#[async_trait]
impl Launcher for SystemLauncher {
    async fn launch(&self, artifact: &LaunchArtifact) -> LaunchResult<LaunchOutcome> {
        let span = tracing::info_span!(crate::tracing::span_names::LAUNCH, protocol = artifact.kind());
        match artifact {
            LaunchArtifact::Rdp { filename, content } => {
                self.launch_rdp(filename, content).instrument(span).await
            }
            LaunchArtifact::Ssh { command } => self.launch_ssh(command).instrument(span).await,
        }
    }
}

/// Per-process directory under the system temp dir
#[must_use]
pub fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join(format!("jms-handler-{}", std::process::id()))
}

/// Makes an envelope filename safe to use as a file stem.
///
/// Path separators, control characters and characters reserved on common
/// filesystems become `_`; leading dots are dropped so the result is never
/// hidden or a relative path component. An empty result becomes
/// `connection`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').trim();
    let cleaned: String = cleaned.chars().take(120).collect();
    if cleaned.is_empty() {
        "connection".to_string()
    } else {
        cleaned
    }
}

/// Escapes text for an AppleScript string literal
#[must_use]
pub fn applescript_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// AppleScript that opens `terminal` and runs `command`
#[must_use]
pub fn terminal_script(terminal: TerminalApp, command: &str) -> String {
    let command = applescript_escape(command);
    let app = terminal.script_name();
    match terminal {
        TerminalApp::ITerm2 => format!(
            "tell application \"{app}\"\n\
             \x20   activate\n\
             \x20   create window with default profile\n\
             \x20   tell current session of current window\n\
             \x20       write text \"{command}\"\n\
             \x20   end tell\n\
             end tell"
        ),
        TerminalApp::Terminal => format!(
            "tell application \"{app}\"\n\
             \x20   activate\n\
             \x20   do script \"{command}\"\n\
             end tell"
        ),
    }
}

/// Deletes `path` after `delay`
pub fn schedule_cleanup(path: PathBuf, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed launch file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Could not remove launch file"),
        }
    })
}

async fn run_program(program: &str, args: &[String]) -> LaunchResult<()> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| LaunchError::SpawnFailed {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        tracing::debug!(program, "External program finished");
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::warn!(program, status = %output.status, stderr = %stderr.trim(), "External program failed");
        Err(LaunchError::ProgramFailed {
            program: program.to_string(),
            status: output.status.to_string(),
        })
    }
}

/// One artifact seen by a [`RecordingLauncher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRecord {
    /// The artifact
    pub artifact: LaunchArtifact,
    /// When it was received
    pub at: DateTime<Utc>,
}

/// Launcher that records artifacts instead of acting on them
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    records: Mutex<Vec<LaunchRecord>>,
}

impl RecordingLauncher {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything launched so far, oldest first
    #[must_use]
    pub fn records(&self) -> Vec<LaunchRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    async fn launch(&self, artifact: &LaunchArtifact) -> LaunchResult<LaunchOutcome> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LaunchRecord {
                artifact: artifact.clone(),
                at: Utc::now(),
            });
        Ok(LaunchOutcome::new(format!("Recorded {} artifact", artifact.kind())))
    }
}
