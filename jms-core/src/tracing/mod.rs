//! Structured logging setup
//!
//! The handler is a short-lived process, so logging is configured once at
//! startup from the CLI flags and the `[logging]` config section. Library code
//! only emits events; nothing in the pipeline installs a subscriber itself.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Errors that can occur while installing the subscriber
#[derive(Debug, Error)]
pub enum TracingError {
    /// The subscriber or filter could not be built
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// `init_tracing` was called twice
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// The log file could not be created
    #[error("Failed to create log file {path}: {source}")]
    FileCreationFailed {
        /// Requested log file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for tracing setup
pub type TracingResult<T> = Result<T, TracingError>;

/// Minimum level of events that are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings (default for the handler)
    #[default]
    Warn,
    /// Adds one line per pipeline stage
    Info,
    /// Adds per-field detail, including usernames
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    /// Converts to the `tracing` crate's level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Level for a `-v` repeat count, starting from `base`
    #[must_use]
    pub const fn from_verbosity(base: Self, verbosity: u8) -> Self {
        match verbosity {
            0 => base,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(TracingError::InitializationFailed(format!(
                "unknown log level '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error
    #[default]
    Stderr,
    /// A file, truncated on open
    File(PathBuf),
}

/// Subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Minimum level
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Include module targets in each line
    pub include_targets: bool,
    /// Custom `EnvFilter` directive, overrides `level`
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl TracingConfig {
    /// Creates a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets whether module targets are printed
    #[must_use]
    pub const fn with_targets(mut self, include: bool) -> Self {
        self.include_targets = include;
        self
    }

    /// Sets a custom filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Debug level on stdout, with targets
    #[must_use]
    pub const fn development() -> Self {
        Self {
            level: TracingLevel::Debug,
            output: TracingOutput::Stdout,
            include_targets: true,
            filter: None,
        }
    }

    /// Warn level on stderr, without targets
    #[must_use]
    pub const fn production() -> Self {
        Self {
            level: TracingLevel::Warn,
            output: TracingOutput::Stderr,
            include_targets: false,
            filter: None,
        }
    }

    /// The `EnvFilter` directive this configuration produces
    #[must_use]
    pub fn filter_directive(&self) -> String {
        self.filter.clone().unwrap_or_else(|| {
            format!("jms_core={level},jms_handler={level}", level = self.level)
        })
    }
}

/// Installs the global subscriber.
///
/// Call once at startup. `RUST_LOG` takes precedence over the configured
/// level when it is set.
///
/// # Errors
///
/// Returns an error if tracing is already initialised, the filter is
/// invalid, or the log file cannot be created. A failed call leaves tracing
/// uninitialised, so it can be retried with another configuration.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    install_subscriber(config).inspect_err(|_| {
        TRACING_INITIALIZED.store(false, Ordering::SeqCst);
    })?;

    tracing::debug!(level = %config.level, "Tracing initialized");

    Ok(())
}

fn install_subscriber(config: &TracingConfig) -> TracingResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter_directive())
            .map_err(|e| TracingError::InitializationFailed(e.to_string()))?,
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_target(config.include_targets)
        .with_level(true);

    let installed = match &config.output {
        TracingOutput::Stdout => tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_writer(std::io::stdout))
            .try_init(),
        TracingOutput::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_writer(std::io::stderr))
            .try_init(),
        TracingOutput::File(path) => {
            let file =
                std::fs::File::create(path).map_err(|source| TracingError::FileCreationFailed {
                    path: path.clone(),
                    source,
                })?;
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_ansi(false).with_writer(std::sync::Arc::new(file)))
                .try_init()
        }
    };
    installed.map_err(|e| TracingError::InitializationFailed(e.to_string()))
}

/// Checks whether [`init_tracing`] has run
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// Span names used by the pipeline
pub mod span_names {
    /// Whole `jms://` URL handling
    pub const HANDLE_URL: &str = "jms.handle_url";
    /// Base64 and envelope decoding
    pub const PAYLOAD_DECODE: &str = "payload.decode";
    /// Connection-info extraction
    pub const EXTRACT: &str = "connection.extract";
    /// Artifact rendering
    pub const RENDER: &str = "artifact.render";
    /// Handing the artifact to an external program
    pub const LAUNCH: &str = "artifact.launch";
    /// Configuration load
    pub const CONFIG_LOAD: &str = "config.load";
    /// Configuration save
    pub const CONFIG_SAVE: &str = "config.save";
}
