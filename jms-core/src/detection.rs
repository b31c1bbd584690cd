//! Helper application detection
//!
//! Finds the programs the launcher hands artifacts to: a terminal
//! application for SSH, `expect` for password automation, and a Remote
//! Desktop client for `.rdp` files. Detection runs external commands and
//! touches the filesystem, so async callers should run it on a blocking
//! thread.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Information about a detected helper program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Display name
    pub name: String,
    /// Location of the binary or application bundle
    pub path: Option<PathBuf>,
    /// Whether it was found
    pub installed: bool,
    /// How to install it when missing
    pub install_hint: Option<String>,
}

impl ClientInfo {
    /// A client that was found at `path`
    #[must_use]
    pub fn installed(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path: Some(path),
            installed: true,
            install_hint: None,
        }
    }

    /// A client that was not found
    #[must_use]
    pub fn not_installed(name: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            installed: false,
            install_hint: Some(install_hint.into()),
        }
    }
}

/// Terminal applications that can run an SSH command, in preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalApp {
    /// iTerm2
    #[serde(rename = "iterm2")]
    ITerm2,
    /// Apple Terminal
    Terminal,
}

impl TerminalApp {
    /// All terminals, most preferred first
    pub const ALL: [Self; 2] = [Self::ITerm2, Self::Terminal];

    /// Display name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ITerm2 => "iTerm2",
            Self::Terminal => "Terminal",
        }
    }

    /// Identifier used in configuration
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::ITerm2 => "iterm2",
            Self::Terminal => "terminal",
        }
    }

    /// Name AppleScript addresses the application by
    #[must_use]
    pub const fn script_name(self) -> &'static str {
        match self {
            Self::ITerm2 => "iTerm",
            Self::Terminal => "Terminal",
        }
    }

    /// Bundle locations relative to the filesystem root or home directory
    #[must_use]
    pub const fn bundle_paths(self) -> &'static [&'static str] {
        match self {
            Self::ITerm2 => &["Applications/iTerm.app"],
            Self::Terminal => &[
                "System/Applications/Utilities/Terminal.app",
                "Applications/Utilities/Terminal.app",
            ],
        }
    }
}

impl fmt::Display for TerminalApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TerminalApp {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iterm2" | "iterm" => Ok(Self::ITerm2),
            "terminal" => Ok(Self::Terminal),
            other => Err(ConfigError::Invalid(format!("unknown terminal '{other}'"))),
        }
    }
}

/// What the environment offers for running SSH sessions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminalCapabilities {
    /// Terminal to open, if any was found
    pub terminal: Option<TerminalApp>,
    /// Path to `expect`, if on `PATH`
    pub expect_path: Option<PathBuf>,
}

impl TerminalCapabilities {
    /// Creates capabilities from known values
    #[must_use]
    pub const fn new(terminal: Option<TerminalApp>, expect_path: Option<PathBuf>) -> Self {
        Self {
            terminal,
            expect_path,
        }
    }

    /// Probes the system. `preferred` is used when installed, otherwise the
    /// first installed terminal in [`TerminalApp::ALL`] order.
    #[must_use]
    pub fn detect(preferred: Option<TerminalApp>) -> Self {
        let roots = search_roots();
        let installed = |app: TerminalApp| find_bundle(app.bundle_paths(), &roots).is_some();

        let terminal = preferred
            .filter(|&app| installed(app))
            .or_else(|| TerminalApp::ALL.into_iter().find(|&app| installed(app)));
        let expect_path = detect_expect().path;

        tracing::debug!(
            terminal = terminal.map(TerminalApp::identifier),
            expect = expect_path.is_some(),
            "Terminal capabilities detected"
        );

        Self {
            terminal,
            expect_path,
        }
    }

    /// Whether password automation is possible
    #[must_use]
    pub const fn has_expect(&self) -> bool {
        self.expect_path.is_some()
    }
}

/// Detects `expect`
#[must_use]
pub fn detect_expect() -> ClientInfo {
    which_binary("expect").map_or_else(
        || ClientInfo::not_installed("expect", "Install expect to type SSH passwords automatically"),
        |path| ClientInfo::installed("expect", path),
    )
}

/// Detects a Remote Desktop client able to open `.rdp` files
#[must_use]
pub fn detect_rdp_client() -> ClientInfo {
    const BUNDLES: &[&str] = &[
        "Applications/Windows App.app",
        "Applications/Microsoft Remote Desktop.app",
    ];

    if let Some(path) = find_bundle(BUNDLES, &search_roots()) {
        return ClientInfo::installed("Microsoft Remote Desktop", path);
    }
    for binary in ["xfreerdp3", "xfreerdp", "remmina"] {
        if let Some(path) = which_binary(binary) {
            return ClientInfo::installed(binary, path);
        }
    }
    ClientInfo::not_installed(
        "Microsoft Remote Desktop",
        "Install Windows App (Microsoft Remote Desktop) from the App Store",
    )
}

/// `/` and the home directory
fn search_roots() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from("/")];
    roots.extend(dirs::home_dir());
    roots
}

/// First existing bundle among `relative` paths under any of `roots`
fn find_bundle(relative: &[&str], roots: &[PathBuf]) -> Option<PathBuf> {
    roots
        .iter()
        .flat_map(|root| relative.iter().map(move |rel| root.join(rel)))
        .find(|path| path.is_dir())
}

/// Looks a binary up on `PATH` with `which`
fn which_binary(binary: &str) -> Option<PathBuf> {
    let output = Command::new("which").arg(binary).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path_str = String::from_utf8_lossy(&output.stdout);
    let path = path_str.trim();
    (!path.is_empty()).then(|| Path::new(path).to_path_buf())
}
